//! Concrete syntax trees.
//!
//! A [`Tree`] owns its root subtree and a handle to the grammar table that
//! produced it. Trees are immutable; [`Tree::edit`] returns a new tree that
//! shares every node the edit did not touch.

mod cursor;
mod node;
pub(crate) mod subtree;


use std::fmt;
use std::sync::Arc;

use sylva_table::GrammarTable;

pub use cursor::TreeCursor;
pub use node::Node;

use crate::edit::InputEdit;
use crate::length::Length;
use subtree::{Subtree, SubtreeData};

#[derive(Clone)]
pub struct Tree {
    root: Subtree,
    table: Arc<GrammarTable>,
}

impl Tree {
    pub(crate) fn new(root: Subtree, table: Arc<GrammarTable>) -> Self {
        Self { root, table }
    }

    pub(crate) fn root(&self) -> &Subtree {
        &self.root
    }

    pub fn table(&self) -> &Arc<GrammarTable> {
        &self.table
    }

    pub fn root_node(&self) -> Node<'_> {
        Node::new(self, &self.root, Length::ZERO)
    }

    pub fn walk(&self) -> TreeCursor<'_> {
        self.root_node().walk()
    }

    pub fn has_error(&self) -> bool {
        self.root.has_error
    }

    /// Byte length of the text the tree was parsed from, adjusted by edits.
    pub fn len(&self) -> u32 {
        self.root.total().bytes
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_sexp(&self) -> String {
        self.root_node().to_sexp()
    }

    /// Apply an edit to the tree's positions.
    ///
    /// Nodes overlapping the edit, or whose lookahead reaches into it, are
    /// rebuilt with adjusted extents and marked as changed. Everything else
    /// is shared with `self`. The result is meant to be handed to the
    /// parser as the old tree for the edited text.
    pub fn edit(&self, edit: &InputEdit) -> Tree {
        tracing::trace!(
            start = edit.start_byte,
            old_end = edit.old_end_byte,
            new_end = edit.new_end_byte,
            "editing tree"
        );
        Tree {
            root: edit_subtree(&self.root, Length::ZERO, edit),
            table: Arc::clone(&self.table),
        }
    }
}

fn edit_subtree(node: &Subtree, position: Length, edit: &InputEdit) -> Subtree {
    let end = position + node.total();
    if !edit.affects(position, end, node.lookahead_bytes) {
        return Arc::clone(node);
    }

    let new_position = edit.map(position);
    let new_content = edit.map(position + node.padding);
    let new_end = edit.map(end);

    let mut children = Vec::with_capacity(node.children.len());
    let mut child_position = position;
    for child in &node.children {
        children.push(edit_subtree(child, child_position, edit));
        child_position += child.total();
    }

    Arc::new(SubtreeData {
        symbol: node.symbol,
        padding: new_content - new_position,
        size: new_end - new_content,
        children,
        fields: node.fields.clone(),
        parse_state: node.parse_state,
        first_leaf_mode: node.first_leaf_mode,
        trailing_lex_mode: node.trailing_lex_mode,
        lookahead_bytes: node.lookahead_bytes,
        extra: node.extra,
        has_error: node.has_error,
        damaged: true,
    })
}

/// Structural equality: same symbols, ranges, fields, and error flags.
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.root.same_structure(&other.root)
    }
}

impl Eq for Tree {}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sexp())
    }
}
