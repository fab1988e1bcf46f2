//! Public entry point for reading command files
//!
//! A [`CommandFileReader`] owns an immutable [`ArgumentTypeRegistry`] and can
//! parse from strings, buffered or unbuffered byte streams, open files and
//! paths. It is cheap to clone and safe to share between threads.
//!
//! ```text
//! let reader = CommandFileReader::default();
//! let tree = reader.parse_path("commands/teleport.cmd")?;
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::parser::ast::LiteralNode;
use crate::parser::error::{ErrorKind, ParseError};
use crate::parser::lexer::Lexer;
use crate::parser::parser::Parser;
use crate::types::{ArgumentTypeParser, ArgumentTypeRegistry, BuiltinArgumentTypeParser};

/// Failure of a top-level read.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The underlying stream or file failed
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The input is not a valid command file
    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl ReadError {
    /// The parse failure, if this is one.
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            ReadError::Parse(err) => Some(err),
            ReadError::Io(_) => None,
        }
    }

    /// Stream failures surface as the underlying `io::Error`.
    fn from_parse(err: ParseError) -> Self {
        if err.kind() != ErrorKind::Io {
            return ReadError::Parse(err);
        }
        let line = err.line();
        match err.into_io_error() {
            Ok(io_err) => {
                debug!(line, error = %io_err, "stream failed while lexing");
                ReadError::Io(io_err)
            }
            Err(err) => ReadError::Parse(err),
        }
    }
}

/// Reads command files into literal-rooted command trees.
#[derive(Debug, Clone)]
pub struct CommandFileReader {
    registry: ArgumentTypeRegistry,
}

impl Default for CommandFileReader {
    /// Reader with the built-in primitive types registered.
    fn default() -> Self {
        Self::new(ArgumentTypeRegistry::with_builtins())
    }
}

impl CommandFileReader {
    pub fn new(registry: ArgumentTypeRegistry) -> Self {
        Self { registry }
    }

    /// Builder starting from an empty resolver list.
    pub fn builder() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    pub fn registry(&self) -> &ArgumentTypeRegistry {
        &self.registry
    }

    pub fn parse_str(&self, source: &str) -> Result<LiteralNode, ReadError> {
        self.parse_buffered(source.as_bytes())
    }

    /// Parses from a buffered character stream. The stream is not closed.
    pub fn parse_buffered<R: BufRead>(&self, reader: R) -> Result<LiteralNode, ReadError> {
        Parser::new(Lexer::new(reader), &self.registry)
            .parse()
            .map_err(ReadError::from_parse)
    }

    /// Parses from a UTF-8 byte stream. The stream is not closed.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<LiteralNode, ReadError> {
        self.parse_buffered(BufReader::new(reader))
    }

    /// Parses from an already open file, reading from its current position.
    pub fn parse_file(&self, file: &File) -> Result<LiteralNode, ReadError> {
        self.parse_reader(file)
    }

    /// Opens, parses and closes the file at `path`.
    pub fn parse_path<P: AsRef<Path>>(&self, path: P) -> Result<LiteralNode, ReadError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading command file");
        let file = File::open(path)?;
        self.parse_reader(file)
    }
}

/// Accumulates argument type parsers for a [`CommandFileReader`].
///
/// Parsers are consulted in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct ReaderBuilder {
    registry: ArgumentTypeRegistry,
}

impl ReaderBuilder {
    pub fn with_argument_type_parser(mut self, parser: impl ArgumentTypeParser + 'static) -> Self {
        self.registry.register(parser);
        self
    }

    pub fn with_shared_parser(mut self, parser: Arc<dyn ArgumentTypeParser>) -> Self {
        self.registry.register_shared(parser);
        self
    }

    pub fn with_builtin_types(self) -> Self {
        self.with_argument_type_parser(BuiltinArgumentTypeParser)
    }

    /// Appends every parser of `registry`, keeping its order.
    pub fn with_registry(mut self, registry: &ArgumentTypeRegistry) -> Self {
        for parser in registry.parsers() {
            self.registry.register_shared(Arc::clone(parser));
        }
        self
    }

    pub fn build(self) -> CommandFileReader {
        CommandFileReader::new(self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PassthroughArgumentTypeParser;

    #[test]
    fn test_default_reader_has_builtins() {
        let reader = CommandFileReader::default();
        assert!(reader.registry().can_parse("builtin", "integer"));
        let tree = reader.parse_str("a { b builtin:bool; }").unwrap();
        assert_eq!(tree.children.len(), 1);
    }

    #[test]
    fn test_builder_starts_empty() {
        let reader = CommandFileReader::builder().build();
        let err = reader.parse_str("a { b builtin:bool; }").unwrap_err();
        let err = err.as_parse_error().unwrap();
        assert_eq!(err.kind(), ErrorKind::UnknownType);
    }

    #[test]
    fn test_builder_keeps_order() {
        let reader = CommandFileReader::builder()
            .with_builtin_types()
            .with_argument_type_parser(PassthroughArgumentTypeParser::new("builtin"))
            .build();
        assert_eq!(reader.registry().parsers().len(), 2);

        // Built-in parser wins for the keys it knows
        let tree = reader.parse_str("a { b builtin:bool x; }").unwrap_err();
        assert_eq!(
            tree.as_parse_error().unwrap().message(),
            "Node definition not ended with semicolon, got string \"x\""
        );

        let tree = reader.parse_str("a { b builtin:vec3 x; }").unwrap();
        assert_eq!(tree.children[0].argument_type().unwrap().to_string(), "builtin:vec3 x");
    }

    #[test]
    fn test_with_registry_copies_parsers() {
        let base = ArgumentTypeRegistry::with_builtins();
        let reader = CommandFileReader::builder()
            .with_registry(&base)
            .with_argument_type_parser(PassthroughArgumentTypeParser::new("ext"))
            .build();
        assert_eq!(reader.registry().parsers().len(), 2);
        assert!(reader.registry().can_parse("ext", "anything"));
    }

    #[test]
    fn test_reader_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CommandFileReader>();
    }
}
