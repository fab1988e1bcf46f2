//! # Introduction
//!
//! cmdfile reads a small text format describing a command-dispatch tree and
//! turns it into an in-memory tree of command nodes. Each node is either a
//! fixed keyword (a literal) or a typed parameter (an argument), so command
//! structures can be written as data instead of nested builder calls.
//!
//! ## Reading pipeline
//!
//! ```text
//! Source → Lexer → Parser (+ ArgumentTypeRegistry) → LiteralNode tree
//! ```
//!
//! 1. [`parser`]: tokenizes the input with one token of lookahead and builds
//!    the tree by recursive descent.
//! 2. [`types`]: resolves `namespace:name` argument type references through an
//!    ordered list of pluggable resolvers.
//! 3. [`reader`]: the public entry point, configured with a builder.
//! 4. [`format`]: writes trees back as canonical text or as an outline.
//!
//! ## Format
//!
//! ```text
//! // teleport command
//! tp {
//!     here;
//!     there "builtin:integer" 0 10 {
//!         reason "builtin:string" greedy_phrase;
//!     }
//! }
//! ```
//!
//! A file holds exactly one literal root node. A node ends either with a
//! `{ ... }` block of children or with `;`.

pub mod format;
pub mod parser;
pub mod reader;
pub mod types;

pub use parser::ast::{ArgumentNode, CommandNode, LiteralNode};
pub use parser::error::{ErrorKind, ParseError};
pub use parser::parser::MAX_DEPTH;
pub use reader::{CommandFileReader, ReadError, ReaderBuilder};
