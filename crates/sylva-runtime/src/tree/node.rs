use std::fmt;
use std::ops::Range;

use sylva_table::{FieldId, Symbol};

use super::Tree;
use super::cursor::TreeCursor;
use super::subtree::SubtreeData;
use crate::length::{Length, Point};

/// A borrowed view of one visible node.
///
/// Hidden leaves (anonymous pattern tokens) are skipped by every child and
/// sibling accessor.
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t Tree,
    data: &'t SubtreeData,
    /// Where the node's padding begins.
    position: Length,
}

impl<'t> Node<'t> {
    pub(crate) fn new(tree: &'t Tree, data: &'t SubtreeData, position: Length) -> Self {
        Self {
            tree,
            data,
            position,
        }
    }

    pub(crate) fn data(&self) -> &'t SubtreeData {
        self.data
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    pub fn kind(&self) -> &'t str {
        self.tree.table().symbol_name(self.data.symbol)
    }

    pub fn kind_id(&self) -> Symbol {
        self.data.symbol
    }

    pub fn is_named(&self) -> bool {
        self.tree.table().is_named(self.data.symbol)
    }

    pub fn is_visible(&self) -> bool {
        self.tree.table().is_visible(self.data.symbol)
    }

    pub fn is_extra(&self) -> bool {
        self.data.extra
    }

    pub fn is_error(&self) -> bool {
        self.data.is_error()
    }

    /// This node or a descendant is an `ERROR`.
    pub fn has_error(&self) -> bool {
        self.data.has_error
    }

    /// Touched by an edit since it was parsed.
    pub fn has_changes(&self) -> bool {
        self.data.damaged
    }

    pub fn start_byte(&self) -> u32 {
        self.position.bytes + self.data.padding.bytes
    }

    pub fn end_byte(&self) -> u32 {
        self.start_byte() + self.data.size.bytes
    }

    pub fn byte_range(&self) -> Range<u32> {
        self.start_byte()..self.end_byte()
    }

    pub fn start_position(&self) -> Point {
        (self.position + self.data.padding).extent
    }

    pub fn end_position(&self) -> Point {
        (self.position + self.data.total()).extent
    }

    /// Source text of the node.
    pub fn utf8_text<'s>(&self, source: &'s [u8]) -> Result<&'s str, std::str::Utf8Error> {
        let end = (self.end_byte() as usize).min(source.len());
        let start = (self.start_byte() as usize).min(end);
        std::str::from_utf8(&source[start..end])
    }

    /// Every stored child with its field, visible or not.
    pub(crate) fn raw_children(&self) -> impl Iterator<Item = (Node<'t>, Option<FieldId>)> + use<'t> {
        let tree = self.tree;
        let mut position = self.position;
        self.data
            .children
            .iter()
            .zip(self.data.fields.iter().copied())
            .map(move |(child, field)| {
                let node = Node::new(tree, child, position);
                position += child.total();
                (node, field)
            })
    }

    fn visible_children(&self) -> impl Iterator<Item = (Node<'t>, Option<FieldId>)> + use<'t> {
        self.raw_children().filter(|(node, _)| node.is_visible())
    }

    pub fn child_count(&self) -> usize {
        self.visible_children().count()
    }

    pub fn child(&self, index: usize) -> Option<Node<'t>> {
        self.visible_children().nth(index).map(|(node, _)| node)
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.visible_children().map(|(node, _)| node)
    }

    pub fn named_child_count(&self) -> usize {
        self.named_children().count()
    }

    pub fn named_child(&self, index: usize) -> Option<Node<'t>> {
        self.named_children().nth(index)
    }

    pub fn named_children(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.children().filter(|node| node.is_named())
    }

    pub fn child_by_field_name(&self, name: &str) -> Option<Node<'t>> {
        self.children_by_field_name(name).next()
    }

    pub fn children_by_field_name(&self, name: &str) -> impl Iterator<Item = Node<'t>> + use<'t> {
        let field = self.tree.table().field_id_for_name(name);
        self.visible_children()
            .filter(move |(_, f)| field.is_some() && *f == field)
            .map(|(node, _)| node)
    }

    /// Field name of the visible child at `index`.
    pub fn field_name_for_child(&self, index: usize) -> Option<&'t str> {
        let (_, field) = self.visible_children().nth(index)?;
        self.tree.table().field_name(field?)
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        let root = self.tree.root_node();
        if self.same_node(&root) {
            return None;
        }
        find_parent(root, self)
    }

    fn same_node(&self, other: &Node<'_>) -> bool {
        std::ptr::eq(self.data, other.data) && self.position == other.position
    }

    /// Index among the parent's visible children.
    fn sibling_index(&self, parent: &Node<'t>) -> Option<usize> {
        parent.children().position(|child| child.same_node(self))
    }

    pub fn next_sibling(&self) -> Option<Node<'t>> {
        let parent = self.parent()?;
        let index = self.sibling_index(&parent)?;
        parent.child(index + 1)
    }

    pub fn prev_sibling(&self) -> Option<Node<'t>> {
        let parent = self.parent()?;
        let index = self.sibling_index(&parent)?;
        parent.child(index.checked_sub(1)?)
    }

    pub fn next_named_sibling(&self) -> Option<Node<'t>> {
        let parent = self.parent()?;
        let index = self.sibling_index(&parent)?;
        parent.children().skip(index + 1).find(|node| node.is_named())
    }

    pub fn prev_named_sibling(&self) -> Option<Node<'t>> {
        let parent = self.parent()?;
        let index = self.sibling_index(&parent)?;
        let before: Vec<Node<'t>> = parent.children().take(index).collect();
        before.into_iter().rev().find(|node| node.is_named())
    }

    /// First visible child that ends after `byte`.
    pub fn first_child_for_byte(&self, byte: u32) -> Option<Node<'t>> {
        self.children().find(|child| child.end_byte() > byte)
    }

    /// Smallest visible node covering `start..end`.
    pub fn descendant_for_byte_range(&self, start: u32, end: u32) -> Option<Node<'t>> {
        if start < self.start_byte() || end > self.end_byte() {
            return None;
        }
        let mut node = *self;
        'descend: loop {
            for child in node.children() {
                if child.start_byte() <= start && end <= child.end_byte() && child.end_byte() > child.start_byte()
                {
                    node = child;
                    continue 'descend;
                }
            }
            return Some(node);
        }
    }

    pub fn walk(&self) -> TreeCursor<'t> {
        TreeCursor::new(*self)
    }

    /// S-expression of the named nodes under this one, with field labels.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        out.push('(');
        out.push_str(self.kind());
        let table = self.tree.table();
        for (child, field) in self.visible_children() {
            if !child.is_named() {
                continue;
            }
            out.push(' ');
            if let Some(name) = field.and_then(|field| table.field_name(field)) {
                out.push_str(name);
                out.push_str(": ");
            }
            child.write_sexp(out);
        }
        out.push(')');
    }
}

fn find_parent<'t>(node: Node<'t>, target: &Node<'_>) -> Option<Node<'t>> {
    let target_start = target.position.bytes;
    let target_end = target_start + target.data.total().bytes;
    for (child, _) in node.raw_children() {
        if child.same_node(target) {
            return Some(node);
        }
        let start = child.position.bytes;
        let end = start + child.data.total().bytes;
        if start <= target_start && target_end <= end && !child.data.children.is_empty() {
            if let Some(found) = find_parent(child, target) {
                return Some(found);
            }
        }
    }
    None
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.same_node(other)
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}..{}]", self.kind(), self.start_byte(), self.end_byte())
    }
}
