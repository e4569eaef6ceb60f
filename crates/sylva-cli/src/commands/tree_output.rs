//! Text and JSON renderings of a syntax tree.

use serde::Serialize;
use sylva_runtime::{Node, Point, Tree, TreeCursor};

/// Indented outline of the named nodes, one per line.
pub fn dump_tree(tree: &Tree, spans: bool) -> String {
    let mut out = String::new();
    let mut cursor = tree.walk();
    format_node(&mut cursor, 0, spans, &mut out);
    out
}

fn format_node(cursor: &mut TreeCursor<'_>, depth: usize, spans: bool, out: &mut String) {
    let node = cursor.node();
    if node.is_named() {
        out.push_str(&"  ".repeat(depth));
        if let Some(field) = cursor.field_name() {
            out.push_str(field);
            out.push_str(": ");
        }
        out.push_str(node.kind());
        if spans {
            let (start, end) = (node.start_position(), node.end_position());
            out.push_str(&format!(
                " [{}:{}-{}:{}]",
                start.row, start.column, end.row, end.column
            ));
        }
        out.push('\n');
    }

    if cursor.goto_first_child() {
        loop {
            format_node(cursor, depth + 1, spans, out);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
}

#[derive(Serialize)]
struct JsonNode<'t> {
    kind: &'t str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'t str>,
    named: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    extra: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    error: bool,
    start_byte: u32,
    end_byte: u32,
    start: Point,
    end: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'t str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<JsonNode<'t>>,
}

impl<'t> JsonNode<'t> {
    fn build(node: Node<'t>, field: Option<&'t str>, source: &'t str) -> Self {
        let children: Vec<JsonNode<'t>> = node
            .children()
            .enumerate()
            .map(|(index, child)| JsonNode::build(child, node.field_name_for_child(index), source))
            .collect();
        let text = if children.is_empty() {
            node.utf8_text(source.as_bytes()).ok()
        } else {
            None
        };
        Self {
            kind: node.kind(),
            field,
            named: node.is_named(),
            extra: node.is_extra(),
            error: node.is_error(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start: node.start_position(),
            end: node.end_position(),
            text,
            children,
        }
    }
}

/// Pretty-printed JSON of every visible node, anonymous ones included.
pub fn tree_json(tree: &Tree, source: &str) -> String {
    let root = JsonNode::build(tree.root_node(), None, source);
    serde_json::to_string_pretty(&root).unwrap_or_default()
}
