//! tree-sitter entry points for Go source.

use crate::GoError;
use tree_sitter::{Node, Parser, Tree};

/// Parse Go source into a syntax tree.
///
/// tree-sitter recovers from syntax errors, so this only fails when the
/// grammar cannot be loaded. Use [`first_syntax_error`] to check the result.
pub fn parse_go(source: &str) -> Result<Tree, GoError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_go::language().into())
        .map_err(|err| GoError::Grammar(err.to_string()))?;
    parser
        .parse(source, None)
        .ok_or_else(|| GoError::Grammar("parser returned no tree".to_string()))
}

/// Position of a syntax error, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// First `ERROR` or missing node in document order, if any.
pub fn first_syntax_error(tree: &Tree) -> Option<SyntaxError> {
    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }
    find_error(root).map(|node| {
        let pos = node.start_position();
        SyntaxError {
            line: pos.row + 1,
            column: pos.column + 1,
        }
    })
}

fn find_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error()
            && let Some(found) = find_error(child)
        {
            return Some(found);
        }
    }
    None
}
