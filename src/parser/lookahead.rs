//! Single-item lookahead over a fallible computation
//!
//! [`Lookahead`] turns a "compute the next item" operation into a lazy,
//! finite sequence that can be peeked one item ahead. It is an explicit
//! state machine:
//!
//! ```text
//! NotReady --compute ok--> Ready --next--> NotReady
//!     |                      |
//!     +--end of data--> Done +
//!     |
//!     +--compute error--> Failed (terminal, every later query errors)
//! ```
//!
//! Once the computation fails the sequence is poisoned: querying it again is
//! a contract violation and reports [`LookaheadError::Poisoned`] instead of
//! handing back stale data.

use thiserror::Error;

/// The computation a [`Lookahead`] pulls items from.
pub trait ComputeNext {
    type Item;
    type Error;

    /// Computes the next item, or `Ok(None)` once there is no more data.
    fn compute_next(&mut self) -> Result<Option<Self::Item>, Self::Error>;
}

#[derive(Debug, Error)]
pub enum LookaheadError<E> {
    #[error("failed to compute next item")]
    Compute(#[source] E),
    #[error("sequence queried after a previous failure")]
    Poisoned,
    #[error("no more items in sequence")]
    Exhausted,
}

#[derive(Debug)]
enum State<T> {
    /// Nothing buffered; the next item has not been computed yet
    NotReady,
    /// An item is buffered and has not been returned by `next`
    Ready(T),
    /// End of data reached
    Done,
    /// The computation failed
    Failed,
}

/// Lazy sequence with one item of lookahead.
#[derive(Debug)]
pub struct Lookahead<S: ComputeNext> {
    source: S,
    state: State<S::Item>,
}

impl<S: ComputeNext> Lookahead<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: State::NotReady,
        }
    }

    /// The underlying computation.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns whether another item is available, computing it if needed.
    pub fn has_next(&mut self) -> Result<bool, LookaheadError<S::Error>> {
        match self.state {
            State::Failed => Err(LookaheadError::Poisoned),
            State::Done => Ok(false),
            State::Ready(_) => Ok(true),
            State::NotReady => self.try_compute_next(),
        }
    }

    fn try_compute_next(&mut self) -> Result<bool, LookaheadError<S::Error>> {
        // Stays failed unless the computation returns normally
        self.state = State::Failed;
        match self.source.compute_next() {
            Ok(Some(item)) => {
                self.state = State::Ready(item);
                Ok(true)
            }
            Ok(None) => {
                self.state = State::Done;
                Ok(false)
            }
            Err(err) => Err(LookaheadError::Compute(err)),
        }
    }

    /// Consumes and returns the next item.
    pub fn next(&mut self) -> Result<S::Item, LookaheadError<S::Error>> {
        self.has_next()?;
        match std::mem::replace(&mut self.state, State::NotReady) {
            State::Ready(item) => Ok(item),
            other => {
                self.state = other;
                Err(LookaheadError::Exhausted)
            }
        }
    }

    /// Returns the next item without consuming it.
    pub fn peek(&mut self) -> Result<&S::Item, LookaheadError<S::Error>> {
        self.has_next()?;
        match &self.state {
            State::Ready(item) => Ok(item),
            _ => Err(LookaheadError::Exhausted),
        }
    }
}
