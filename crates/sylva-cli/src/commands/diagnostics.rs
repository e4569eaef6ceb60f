//! Syntax errors found in a tree, rendered as annotated snippets.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use sylva_runtime::{Node, Tree};

/// Byte ranges of the outermost ERROR nodes, in source order.
pub fn syntax_errors(tree: &Tree) -> Vec<Range<usize>> {
    let mut errors = Vec::new();
    collect(tree.root_node(), &mut errors);
    errors
}

fn collect(node: Node<'_>, errors: &mut Vec<Range<usize>>) {
    if node.is_error() {
        errors.push(node.start_byte() as usize..node.end_byte() as usize);
        return;
    }
    if !node.has_error() {
        return;
    }
    for child in node.children() {
        collect(child, errors);
    }
}

pub fn render_errors(source: &str, path: &str, errors: &[Range<usize>], colored: bool) -> String {
    let renderer = if colored {
        Renderer::styled()
    } else {
        Renderer::plain()
    };

    let mut out = String::new();
    for (i, range) in errors.iter().enumerate() {
        let label = describe(source, range);
        let snippet = Snippet::source(source)
            .line_start(1)
            .path(path)
            .annotation(AnnotationKind::Primary.span(adjust_range(range, source.len())).label(&label));
        let report: Vec<Group> = vec![Level::ERROR.primary_title("syntax error").element(snippet)];

        if i > 0 {
            out.push('\n');
        }
        writeln!(out, "{}", renderer.render(&report)).unwrap();
    }
    out
}

fn describe(source: &str, range: &Range<usize>) -> String {
    match source.get(range.clone()) {
        Some(text) if !text.trim().is_empty() => {
            let text = text.trim();
            match text.char_indices().nth(32) {
                Some((cut, _)) => format!("unexpected `{}...`", &text[..cut]),
                None => format!("unexpected `{text}`"),
            }
        }
        _ => "unexpected end of input".to_owned(),
    }
}

fn adjust_range(range: &Range<usize>, limit: usize) -> Range<usize> {
    if range.start == range.end {
        return range.start..(range.start + 1).min(limit);
    }
    range.clone()
}
