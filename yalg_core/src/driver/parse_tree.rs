use std::fmt;

use serde::Serialize;

use crate::lalr::{Production, AUGMENTED_START};
use crate::lexical::Token;

/// Node of the parse tree, children are exclusively owned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParseTreeNode {
    Leaf {
        terminal: String,
        value: String,
    },
    Node {
        nonterminal: String,
        /// The production that built this node, e.g. `E -> E + T`
        production: String,
        children: Vec<ParseTreeNode>,
    },
}

impl ParseTreeNode {
    /// Terminal or nonterminal name of the node
    pub fn name(&self) -> &str {
        match self {
            ParseTreeNode::Leaf { terminal, .. } => terminal,
            ParseTreeNode::Node { nonterminal, .. } => nonterminal,
        }
    }

    pub fn children(&self) -> &[ParseTreeNode] {
        match self {
            ParseTreeNode::Leaf { .. } => &[],
            ParseTreeNode::Node { children, .. } => children,
        }
    }

    /// Token values at the leaves, left to right
    pub fn leaf_values(&self) -> Vec<&str> {
        let mut values = Vec::new();
        self.collect_leaves(&mut values);
        values
    }

    fn collect_leaves<'a>(&'a self, values: &mut Vec<&'a str>) {
        match self {
            ParseTreeNode::Leaf { value, .. } => values.push(value),
            ParseTreeNode::Node { children, .. } => {
                for child in children {
                    child.collect_leaves(values);
                }
            }
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            ParseTreeNode::Leaf { terminal, value } => writeln!(f, "{}{} {:?}", indent, terminal, value),
            ParseTreeNode::Node {
                production,
                children,
                ..
            } => {
                writeln!(f, "{}{}", indent, production)?;
                for child in children {
                    child.render(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Indented text rendering, one node per line
impl fmt::Display for ParseTreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

/// Tree stack mirroring the parser's symbol stack
#[derive(Debug, Default)]
pub struct TreeBuilder {
    stack: Vec<ParseTreeNode>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shift(&mut self, token: &Token) {
        self.stack.push(ParseTreeNode::Leaf {
            terminal: token.tag.clone(),
            value: token.value.clone(),
        });
    }

    /// Replace the top `production.len()` nodes by one node for `production.lhs`
    pub fn reduce(&mut self, production: &Production) {
        let split = self.stack.len().saturating_sub(production.len());
        let children = self.stack.split_off(split);
        self.stack.push(ParseTreeNode::Node {
            nonterminal: production.lhs.clone(),
            production: production.to_string(),
            children,
        });
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Root of the finished tree
    ///
    /// After an accept the stack holds the start symbol's node alone. Anything else is wrapped
    /// under an `S'` node.
    pub fn finish(mut self) -> ParseTreeNode {
        if self.stack.len() == 1 {
            if let Some(root) = self.stack.pop() {
                return root;
            }
        }
        ParseTreeNode::Node {
            nonterminal: AUGMENTED_START.to_owned(),
            production: AUGMENTED_START.to_owned(),
            children: self.stack,
        }
    }
}
