//! Writing command trees back out
//!
//! - [`to_dsl`]: canonical command file text; parsing it yields an equal tree
//! - [`render_tree`]: box-drawing outline for terminals
//! - [`find_duplicate_siblings`]: sibling name collisions, which the parser
//!   accepts without complaint

use rustc_hash::FxHashSet;

use crate::parser::ast::{CommandNode, LiteralNode};
use crate::parser::lexer::is_word_char;

const INDENT: &str = "    ";

/// Renders `root` as canonical command file text.
pub fn to_dsl(root: &LiteralNode) -> String {
    let mut out = String::new();
    write_node(&mut out, &root.name, None, &root.children, 0);
    out
}

fn write_node(
    out: &mut String,
    name: &str,
    argument: Option<(String, Vec<String>)>,
    children: &[CommandNode],
    depth: usize,
) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(&quote_if_needed(name));

    if let Some((key, parameters)) = argument {
        // Type keys are always quoted for readability
        out.push(' ');
        out.push_str(&quote(&key));
        for param in parameters {
            out.push(' ');
            out.push_str(&quote_if_needed(&param));
        }
    }

    if children.is_empty() {
        out.push_str(";\n");
        return;
    }

    out.push_str(" {\n");
    for child in children {
        match child {
            CommandNode::Literal(node) => {
                write_node(out, &node.name, None, &node.children, depth + 1)
            }
            CommandNode::Argument(node) => write_node(
                out,
                &node.name,
                Some((node.argument_type.key(), node.argument_type.parameters())),
                &node.children,
                depth + 1,
            ),
        }
    }
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str("}\n");
}

/// Whether `text` lexes back to itself as a bare word.
fn is_plain_word(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(is_word_char)
        && !text.contains("//")
        && !text.contains("/*")
}

fn quote_if_needed(text: &str) -> String {
    if is_plain_word(text) {
        text.to_string()
    } else {
        quote(text)
    }
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

/// Renders an outline of the tree, one node per line.
pub fn render_tree(root: &LiteralNode) -> String {
    let mut out = format!("{}\n", root.name);
    render_children(&mut out, &root.children, "");
    out
}

fn render_children(out: &mut String, children: &[CommandNode], prefix: &str) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let branch = if last { "└── " } else { "├── " };
        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(child.name());
        if let Some(ty) = child.argument_type() {
            out.push_str(&format!(" <{}>", ty));
        }
        out.push('\n');

        let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
        render_children(out, child.children(), &nested);
    }
}

/// A name that appears more than once among the children of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSibling {
    /// Names from the root down to the parent node
    pub path: Vec<String>,
    pub name: String,
}

/// Finds sibling name collisions anywhere in the tree.
pub fn find_duplicate_siblings(root: &LiteralNode) -> Vec<DuplicateSibling> {
    let mut found = Vec::new();
    let mut path = vec![root.name.clone()];
    collect_duplicates(&root.children, &mut path, &mut found);
    found
}

fn collect_duplicates(
    children: &[CommandNode],
    path: &mut Vec<String>,
    found: &mut Vec<DuplicateSibling>,
) {
    let mut seen = FxHashSet::default();
    let mut reported = FxHashSet::default();
    for child in children {
        if !seen.insert(child.name()) && reported.insert(child.name()) {
            found.push(DuplicateSibling {
                path: path.clone(),
                name: child.name().to_string(),
            });
        }
    }

    for child in children {
        path.push(child.name().to_string());
        collect_duplicates(child.children(), path, found);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::ArgumentNode;
    use crate::types::{ArgumentType, Bounds, CustomType, StringKind};
    use pretty_assertions::assert_eq;

    fn sample() -> LiteralNode {
        LiteralNode::new("tp")
            .with_child(LiteralNode::new("here"))
            .with_child(
                ArgumentNode::new(
                    "there",
                    ArgumentType::Integer {
                        bounds: Bounds::new(0, 10),
                    },
                )
                .with_child(ArgumentNode::new(
                    "reason",
                    ArgumentType::String {
                        kind: StringKind::GreedyPhrase,
                    },
                )),
            )
    }

    #[test]
    fn test_to_dsl_layout() {
        let expected = "tp {
    here;
    there \"builtin:integer\" 0 10 {
        reason \"builtin:string\" greedy_phrase;
    }
}
";
        assert_eq!(to_dsl(&sample()), expected);
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote_if_needed("plain-word"), "plain-word");
        assert_eq!(quote_if_needed("two words"), "\"two words\"");
        assert_eq!(quote_if_needed(""), "\"\"");
        assert_eq!(quote_if_needed("a;b"), "\"a;b\"");
        assert_eq!(quote_if_needed("a//b"), "\"a//b\"");
        assert_eq!(quote_if_needed("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote_if_needed("naïve"), "\"naïve\"");
    }

    #[test]
    fn test_custom_parameters_are_quoted_when_needed() {
        let root = LiteralNode::new("r").with_child(ArgumentNode::new(
            "e",
            ArgumentType::Custom(CustomType {
                namespace: "game".to_string(),
                name: "entity".to_string(),
                parameters: vec!["single".to_string(), "two words".to_string()],
            }),
        ));
        assert_eq!(
            to_dsl(&root),
            "r {\n    e \"game:entity\" single \"two words\";\n}\n"
        );
    }

    #[test]
    fn test_render_tree() {
        let expected = "tp
├── here
└── there <builtin:integer 0 10>
    └── reason <builtin:string greedy_phrase>
";
        assert_eq!(render_tree(&sample()), expected);
    }

    #[test]
    fn test_find_duplicate_siblings() {
        let root = LiteralNode::new("a")
            .with_child(LiteralNode::new("b"))
            .with_child(LiteralNode::new("b"))
            .with_child(LiteralNode::new("b"))
            .with_child(
                LiteralNode::new("c")
                    .with_child(LiteralNode::new("d"))
                    .with_child(LiteralNode::new("d")),
            );

        let found = find_duplicate_siblings(&root);
        assert_eq!(
            found,
            vec![
                DuplicateSibling {
                    path: vec!["a".to_string()],
                    name: "b".to_string(),
                },
                DuplicateSibling {
                    path: vec!["a".to_string(), "c".to_string()],
                    name: "d".to_string(),
                },
            ]
        );
    }
}
