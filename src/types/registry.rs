//! Pluggable argument type resolution
//!
//! The registry holds an ordered list of [`ArgumentTypeParser`]s. Resolution
//! is first-match-wins in registration order, so a parser registered earlier
//! shadows any later parser that accepts the same key.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::argument::ArgumentType;
use super::builtin::BuiltinArgumentTypeParser;
use crate::parser::error::{ErrorKind, ParseError};
use crate::parser::lexer::TokenStream;

/// Resolves `namespace:name` type references into [`ArgumentType`]s.
///
/// Implementations hold no per-parse state and may be shared across threads.
pub trait ArgumentTypeParser: fmt::Debug + Send + Sync {
    /// Whether this parser handles the given type. Must not consume input.
    fn can_parse(&self, namespace: &str, name: &str) -> bool;

    /// Builds the type, consuming any parameter tokens it takes from `tokens`.
    fn parse(
        &self,
        namespace: &str,
        name: &str,
        tokens: &mut dyn TokenStream,
    ) -> Result<ArgumentType, ParseError>;
}

/// Ordered, immutable-after-build collection of type parsers.
#[derive(Debug, Clone, Default)]
pub struct ArgumentTypeRegistry {
    parsers: Vec<Arc<dyn ArgumentTypeParser>>,
}

impl ArgumentTypeRegistry {
    /// An empty registry; every type reference fails to resolve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with only the built-in primitive types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(BuiltinArgumentTypeParser);
        registry
    }

    /// Appends a parser; it is tried after every parser already registered.
    pub fn register(&mut self, parser: impl ArgumentTypeParser + 'static) {
        self.parsers.push(Arc::new(parser));
    }

    pub fn register_shared(&mut self, parser: Arc<dyn ArgumentTypeParser>) {
        self.parsers.push(parser);
    }

    pub fn parsers(&self) -> &[Arc<dyn ArgumentTypeParser>] {
        &self.parsers
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// First registered parser accepting the key, if any.
    pub fn find(&self, namespace: &str, name: &str) -> Option<&dyn ArgumentTypeParser> {
        self.parsers
            .iter()
            .map(|parser| parser.as_ref())
            .find(|parser| parser.can_parse(namespace, name))
    }

    pub fn can_parse(&self, namespace: &str, name: &str) -> bool {
        self.find(namespace, name).is_some()
    }

    /// Resolves a type reference with the first parser that accepts it.
    pub fn resolve(
        &self,
        namespace: &str,
        name: &str,
        tokens: &mut dyn TokenStream,
    ) -> Result<ArgumentType, ParseError> {
        match self.find(namespace, name) {
            Some(parser) => {
                debug!(namespace, name, ?parser, "resolving argument type");
                parser.parse(namespace, name, tokens)
            }
            None => Err(tokens.error(
                ErrorKind::UnknownType,
                format!("Unable to parse argument type: {}:{}", namespace, name),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;
    use crate::types::argument::{Bounds, CustomType};

    /// Claims every `builtin:integer` and ignores its parameters.
    #[derive(Debug)]
    struct FixedInteger;

    impl ArgumentTypeParser for FixedInteger {
        fn can_parse(&self, namespace: &str, name: &str) -> bool {
            namespace == "builtin" && name == "integer"
        }

        fn parse(
            &self,
            _namespace: &str,
            _name: &str,
            _tokens: &mut dyn TokenStream,
        ) -> Result<ArgumentType, ParseError> {
            Ok(ArgumentType::Integer {
                bounds: Bounds::new(1, 2),
            })
        }
    }

    #[derive(Debug)]
    struct Everything;

    impl ArgumentTypeParser for Everything {
        fn can_parse(&self, _namespace: &str, _name: &str) -> bool {
            true
        }

        fn parse(
            &self,
            namespace: &str,
            name: &str,
            _tokens: &mut dyn TokenStream,
        ) -> Result<ArgumentType, ParseError> {
            Ok(ArgumentType::Custom(CustomType {
                namespace: namespace.to_string(),
                name: name.to_string(),
                parameters: Vec::new(),
            }))
        }
    }

    #[test]
    fn test_first_match_wins() {
        let mut registry = ArgumentTypeRegistry::new();
        registry.register(FixedInteger);
        registry.register(BuiltinArgumentTypeParser);

        let mut tokens = Lexer::from_source("5 6;");
        let ty = registry.resolve("builtin", "integer", &mut tokens).unwrap();
        assert_eq!(
            ty,
            ArgumentType::Integer {
                bounds: Bounds::new(1, 2)
            }
        );

        let mut registry = ArgumentTypeRegistry::with_builtins();
        registry.register(FixedInteger);
        let mut tokens = Lexer::from_source("5 6;");
        let ty = registry.resolve("builtin", "integer", &mut tokens).unwrap();
        assert_eq!(
            ty,
            ArgumentType::Integer {
                bounds: Bounds::new(5, 6)
            }
        );
    }

    #[test]
    fn test_unknown_type_names_full_key() {
        let registry = ArgumentTypeRegistry::with_builtins();
        let mut tokens = Lexer::from_source(";");
        let err = registry
            .resolve("nosuch", "thing", &mut tokens)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownType);
        assert_eq!(err.message(), "Unable to parse argument type: nosuch:thing");
    }

    #[test]
    fn test_empty_registry_rejects_builtins() {
        let registry = ArgumentTypeRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.can_parse("builtin", "bool"));
    }

    #[test]
    fn test_fallback_after_builtins() {
        let mut registry = ArgumentTypeRegistry::with_builtins();
        registry.register(Everything);
        assert_eq!(registry.parsers().len(), 2);

        let mut tokens = Lexer::from_source(";");
        let ty = registry.resolve("custom", "thing", &mut tokens).unwrap();
        assert_eq!(ty.key(), "custom:thing");

        let ty = registry.resolve("builtin", "bool", &mut tokens).unwrap();
        assert_eq!(ty, ArgumentType::Bool);
    }
}
