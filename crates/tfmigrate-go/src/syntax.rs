//! Small helpers over tree-sitter-go nodes.
//!
//! Comments are extras in the grammar and can appear between any two
//! children, so every helper here skips them.

use tree_sitter::Node;

pub(crate) fn text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Named children without comments.
pub(crate) fn named<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Strip `literal_element` wrappers around composite literal keys and values.
pub(crate) fn unwrap_element(mut node: Node) -> Node {
    while matches!(node.kind(), "literal_element" | "element") {
        match named(node).into_iter().next() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Top-level statements of a `block`.
pub(crate) fn statements(block: Node) -> Vec<Node> {
    let mut out = Vec::new();
    for child in named(block) {
        if child.kind() == "statement_list" {
            out.extend(named(child));
        } else {
            out.push(child);
        }
    }
    out
}

/// Members of an `expression_list`, or the node itself.
pub(crate) fn expressions(node: Node) -> Vec<Node> {
    if node.kind() == "expression_list" {
        named(node)
    } else {
        vec![node]
    }
}

/// Key and value of a `keyed_element`.
pub(crate) fn keyed_parts(element: Node) -> Option<(Node, Node)> {
    if let (Some(key), Some(value)) = (
        element.child_by_field_name("key"),
        element.child_by_field_name("value"),
    ) {
        return Some((unwrap_element(key), unwrap_element(value)));
    }
    let parts = named(element);
    match parts.as_slice() {
        [key, value] => Some((unwrap_element(*key), unwrap_element(*value))),
        _ => None,
    }
}

/// Identifier text of a struct field key (`Type:`, `Optional:`, ...).
pub(crate) fn field_key<'s>(key: Node, source: &'s str) -> Option<&'s str> {
    match key.kind() {
        "identifier" | "field_identifier" | "type_identifier" => Some(text(key, source)),
        _ => None,
    }
}

/// Whether `ty` names `name`, optionally behind a pointer or package qualifier.
pub(crate) fn is_type_named(ty: Node, source: &str, name: &str) -> bool {
    match ty.kind() {
        "pointer_type" | "parenthesized_type" => named(ty)
            .into_iter()
            .next()
            .is_some_and(|inner| is_type_named(inner, source, name)),
        "qualified_type" => ty
            .child_by_field_name("name")
            .is_some_and(|n| text(n, source) == name),
        "type_identifier" => text(ty, source) == name,
        _ => false,
    }
}

/// The operator token of a unary or binary expression.
pub(crate) fn operator(node: Node) -> Option<&'static str> {
    node.child_by_field_name("operator").map(|op| op.kind())
}

/// Pre-order search for the first node satisfying `pred`.
pub(crate) fn find_first<'t>(node: Node<'t>, pred: &dyn Fn(Node<'t>) -> bool) -> Option<Node<'t>> {
    if pred(node) {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.named_children(&mut cursor).collect();
    children.into_iter().find_map(|child| find_first(child, pred))
}

/// Single-line excerpt of an expression for error messages.
pub(crate) fn excerpt(node: Node, source: &str) -> String {
    let text = text(node, source);
    let first = text.lines().next().unwrap_or("");
    if first.len() < text.len() || first.chars().count() > 60 {
        let short: String = first.chars().take(60).collect();
        format!("{}...", short.trim_end())
    } else {
        first.to_string()
    }
}
