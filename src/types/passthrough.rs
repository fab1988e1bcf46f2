//! Resolver for caller-defined namespaces
//!
//! Accepts every type name in one namespace and keeps the following string
//! tokens verbatim as parameters. Useful when the consumer of the tree
//! interprets the types itself.

use super::argument::{ArgumentType, CustomType};
use super::registry::ArgumentTypeParser;
use crate::parser::error::ParseError;
use crate::parser::lexer::{Token, TokenStream};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassthroughArgumentTypeParser {
    namespace: String,
}

impl PassthroughArgumentTypeParser {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }
}

impl ArgumentTypeParser for PassthroughArgumentTypeParser {
    fn can_parse(&self, namespace: &str, _name: &str) -> bool {
        namespace == self.namespace
    }

    fn parse(
        &self,
        namespace: &str,
        name: &str,
        tokens: &mut dyn TokenStream,
    ) -> Result<ArgumentType, ParseError> {
        let mut parameters = Vec::new();
        while tokens.peek_is_string()? {
            if let Token::String(param) = tokens.next()? {
                parameters.push(param);
            }
        }

        Ok(ArgumentType::Custom(CustomType {
            namespace: namespace.to_string(),
            name: name.to_string(),
            parameters,
        }))
    }
}
