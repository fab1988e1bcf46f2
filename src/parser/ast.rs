// Command tree definitions produced by the parser

use serde::{Deserialize, Serialize};

use crate::types::ArgumentType;

/// A node that matches a fixed keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CommandNode>,
}

/// A node that accepts a typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentNode {
    pub name: String,
    pub argument_type: ArgumentType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CommandNode>,
}

/// One node of a command tree. Children keep source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandNode {
    Literal(LiteralNode),
    Argument(ArgumentNode),
}

impl LiteralNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: impl Into<CommandNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|c| c.name() == name)
    }

    /// Number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(CommandNode::node_count).sum::<usize>()
    }
}

impl ArgumentNode {
    pub fn new(name: impl Into<String>, argument_type: ArgumentType) -> Self {
        Self {
            name: name.into(),
            argument_type,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: impl Into<CommandNode>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl CommandNode {
    pub fn name(&self) -> &str {
        match self {
            CommandNode::Literal(node) => &node.name,
            CommandNode::Argument(node) => &node.name,
        }
    }

    pub fn children(&self) -> &[CommandNode] {
        match self {
            CommandNode::Literal(node) => &node.children,
            CommandNode::Argument(node) => &node.children,
        }
    }

    pub fn argument_type(&self) -> Option<&ArgumentType> {
        match self {
            CommandNode::Literal(_) => None,
            CommandNode::Argument(node) => Some(&node.argument_type),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, CommandNode::Literal(_))
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children().iter().find(|c| c.name() == name)
    }

    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(CommandNode::node_count).sum::<usize>()
    }
}

impl From<LiteralNode> for CommandNode {
    fn from(node: LiteralNode) -> Self {
        CommandNode::Literal(node)
    }
}

impl From<ArgumentNode> for CommandNode {
    fn from(node: ArgumentNode) -> Self {
        CommandNode::Argument(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bounds;

    fn sample() -> LiteralNode {
        LiteralNode::new("tp").with_child(LiteralNode::new("here")).with_child(
            ArgumentNode::new(
                "there",
                ArgumentType::Integer {
                    bounds: Bounds::new(0, 10),
                },
            )
            .with_child(LiteralNode::new("now")),
        )
    }

    #[test]
    fn test_navigation() {
        let tree = sample();
        assert_eq!(tree.node_count(), 4);
        assert!(tree.child("here").unwrap().is_literal());

        let there = tree.child("there").unwrap();
        assert!(!there.is_literal());
        assert_eq!(there.argument_type().unwrap().key(), "builtin:integer");
        assert_eq!(there.child("now").unwrap().children().len(), 0);
        assert!(tree.child("missing").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let tree = sample();
        let json = serde_json::to_string(&tree).unwrap();
        let back: LiteralNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
