//! Error types for lexing and parsing command files
//!
//! Every failure carries the 1-based source line where it was detected, so
//! callers can handle all failure sites the same way. The [`ErrorKind`]
//! tells them which stage rejected the input.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use thiserror::Error;

/// Boxed lower-level cause attached to a [`ParseError`].
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Which stage rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A character the lexer has no rule for
    Lexical,
    /// Wrong token kind or shape at a grammar position
    Grammar,
    /// No registered resolver accepts a `namespace:name` key
    UnknownType,
    /// A resolver parameter is missing, of the wrong kind, or malformed
    InvalidParameter,
    /// The underlying stream failed while lexing
    Io,
    /// A token stream was queried after it failed or ran out
    Misuse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Lexical => "lexical error",
            ErrorKind::Grammar => "grammar error",
            ErrorKind::UnknownType => "unknown argument type",
            ErrorKind::InvalidParameter => "invalid argument type parameter",
            ErrorKind::Io => "i/o error",
            ErrorKind::Misuse => "token stream misuse",
        };
        f.write_str(label)
    }
}

/// A failure while reading a command file.
#[derive(Debug, Error)]
#[error("{message} (line {line})")]
pub struct ParseError {
    kind: ErrorKind,
    message: String,
    line: usize,
    #[source]
    cause: Option<BoxedCause>,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            cause: None,
        }
    }

    pub fn with_cause(
        kind: ErrorKind,
        message: impl Into<String>,
        line: usize,
        cause: impl Into<BoxedCause>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            cause: Some(cause.into()),
        }
    }

    /// Wraps an I/O failure raised while reading `line`.
    pub fn io(err: io::Error, line: usize) -> Self {
        let message = err.to_string();
        Self::with_cause(ErrorKind::Io, message, line, err)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 1-based line number at the point of failure.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Recovers the underlying `io::Error` if this failure was caused by one.
    pub fn into_io_error(self) -> Result<io::Error, Self> {
        match self.cause {
            Some(cause) => match cause.downcast::<io::Error>() {
                Ok(err) => Ok(*err),
                Err(cause) => Err(Self {
                    cause: Some(cause),
                    ..self
                }),
            },
            None => Err(Self { cause: None, ..self }),
        }
    }
}
