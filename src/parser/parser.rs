//! Recursive descent parser for command files
//!
//! Grammar:
//!
//! ```text
//! tree := node EOF
//! node := name (type)? ( '{' node* '}' | ';' )
//! name := StringToken
//! type := StringToken   // "namespace:name", parameters consumed by the resolver
//! ```
//!
//! The parser works on any [`TokenStream`] and never looks more than one token
//! ahead. There is no error recovery: the first error aborts the parse.
//!
//! Nesting is limited to [`MAX_DEPTH`] levels below the root. Deeper input is
//! a grammar error rather than a stack overflow, which also keeps the
//! recursive walks in [`crate::format`] and [`LiteralNode::node_count`] bounded
//! for every parsed tree.

use tracing::{debug, trace};

use crate::parser::ast::{ArgumentNode, CommandNode, LiteralNode};
use crate::parser::error::{ErrorKind, ParseError};
use crate::parser::lexer::{Token, TokenStream};
use crate::types::{ArgumentType, ArgumentTypeRegistry};

/// Deepest level a node may sit at below the root.
pub const MAX_DEPTH: usize = 128;

/// Builds a command tree from a token stream.
pub struct Parser<'r, T: TokenStream> {
    tokens: T,
    registry: &'r ArgumentTypeRegistry,
}

impl<'r, T: TokenStream> Parser<'r, T> {
    pub fn new(tokens: T, registry: &'r ArgumentTypeRegistry) -> Self {
        Self { tokens, registry }
    }

    /// Parses exactly one literal-rooted tree followed by end of input.
    pub fn parse(mut self) -> Result<LiteralNode, ParseError> {
        let root = match self.parse_node(0)? {
            CommandNode::Literal(root) => root,
            CommandNode::Argument(_) => {
                return Err(self.error("Root command node is not a literal command node"));
            }
        };

        let next = self.tokens.peek()?;
        if *next != Token::EndOfInput {
            let message = format!("Expected end of input but got {}", next);
            return Err(self.error(message));
        }

        debug!(root = %root.name, nodes = root.node_count(), "parsed command tree");
        Ok(root)
    }

    fn parse_node(&mut self, depth: usize) -> Result<CommandNode, ParseError> {
        if depth > MAX_DEPTH {
            let message = format!("Command nesting exceeds maximum depth of {}", MAX_DEPTH);
            return Err(self.error(message));
        }

        let name = self.tokens.expect_string(ErrorKind::Grammar, "node name")?;

        let argument_type = if self.tokens.peek_is_string()? {
            Some(self.parse_argument_type()?)
        } else {
            None
        };

        let children = if *self.tokens.peek()? == Token::OpenBlock {
            self.tokens.next()?;
            let mut children = Vec::new();
            while *self.tokens.peek()? != Token::CloseBlock {
                children.push(self.parse_node(depth + 1)?);
            }
            self.tokens.next()?;
            children
        } else {
            let next = self.tokens.peek()?;
            if *next != Token::StatementEnd {
                let message = format!("Node definition not ended with semicolon, got {}", next);
                return Err(self.error(message));
            }
            self.tokens.next()?;
            Vec::new()
        };

        trace!(%name, children = children.len(), "parsed node");
        Ok(match argument_type {
            Some(argument_type) => CommandNode::Argument(ArgumentNode {
                name,
                argument_type,
                children,
            }),
            None => CommandNode::Literal(LiteralNode { name, children }),
        })
    }

    fn parse_argument_type(&mut self) -> Result<ArgumentType, ParseError> {
        let key = self
            .tokens
            .expect_string(ErrorKind::Grammar, "argument type")?;

        let mut parts = key.split(':');
        let (namespace, name) = match (parts.next(), parts.next(), parts.next()) {
            (Some(namespace), Some(name), None) if !namespace.is_empty() && !name.is_empty() => {
                (namespace, name)
            }
            _ => {
                return Err(self.error(format!("Invalid key for argument type: {}", key)));
            }
        };

        self.registry.resolve(namespace, name, &mut self.tokens)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        self.tokens.error(ErrorKind::Grammar, message.into())
    }
}
