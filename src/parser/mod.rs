//! Command file parser
//!
//! This module transforms command file text into a command tree:
//! - [`lookahead`]: single-item lookahead over a fallible computation
//! - [`lexer`]: tokenization (character stream → tokens)
//! - [`parser`]: parsing (tokens → tree)
//! - [`ast`]: command tree node definitions
//! - [`error`]: the [`ParseError`](error::ParseError) carried by every failure
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one token of lookahead. Argument
//! type references are handed to an
//! [`ArgumentTypeRegistry`](crate::types::ArgumentTypeRegistry), which lets
//! resolvers consume their own parameter tokens.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod lookahead;
pub mod parser;
