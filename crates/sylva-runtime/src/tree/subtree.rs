//! Shared, immutable tree nodes.

use std::sync::Arc;

use sylva_table::{FieldId, LexModeId, StateId, Symbol};

use crate::length::Length;
use crate::lexer::Token;

pub(crate) type Subtree = Arc<SubtreeData>;

/// A node as stored in the tree. Positions are implicit: a node only knows
/// its own padding and size, so unchanged subtrees can be shared between an
/// old tree and its reparse.
#[derive(Clone, Debug)]
pub(crate) struct SubtreeData {
    pub symbol: Symbol,
    /// Trivia before the node's first byte.
    pub padding: Length,
    pub size: Length,
    pub children: Vec<Subtree>,
    /// Field of each child, parallel to `children`.
    pub fields: Vec<Option<FieldId>>,
    /// State on top of the stack when the node was pushed.
    pub parse_state: StateId,
    /// Lex mode of the first leaf. `None` for empty nodes.
    pub first_leaf_mode: Option<LexModeId>,
    /// Lex mode of the lookahead that completed the node. `None` when that
    /// token was lexed during error recovery.
    pub trailing_lex_mode: Option<LexModeId>,
    /// Bytes past the end that influenced the node.
    pub lookahead_bytes: u32,
    pub extra: bool,
    pub has_error: bool,
    /// Overlapped by an edit since the node was parsed.
    pub damaged: bool,
}

impl SubtreeData {
    pub fn leaf(token: &Token, parse_state: StateId, extra: bool) -> Self {
        Self {
            symbol: token.symbol,
            padding: token.padding,
            size: token.size,
            children: Vec::new(),
            fields: Vec::new(),
            parse_state,
            first_leaf_mode: Some(token.lex_mode),
            trailing_lex_mode: None,
            lookahead_bytes: token.lookahead_bytes,
            extra,
            has_error: token.symbol == Symbol::ERROR,
            damaged: false,
        }
    }

    /// Padding plus size.
    pub fn total(&self) -> Length {
        self.padding + self.size
    }

    pub fn is_error(&self) -> bool {
        self.symbol == Symbol::ERROR
    }

    /// Same symbols, extents, fields, and flags, recursively. Parser
    /// bookkeeping is ignored.
    pub fn same_structure(&self, other: &SubtreeData) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.symbol == other.symbol
            && self.padding == other.padding
            && self.size == other.size
            && self.extra == other.extra
            && self.has_error == other.has_error
            && self.fields == other.fields
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_structure(b))
    }
}

/// Copy of `node` with a different `extra` flag, sharing it when unchanged.
pub(crate) fn with_extra(node: Subtree, extra: bool) -> Subtree {
    if node.extra == extra {
        return node;
    }
    let mut data = Arc::unwrap_or_clone(node);
    data.extra = extra;
    Arc::new(data)
}

/// One `ERROR` leaf covering `first` and the directly adjacent `next`, if
/// both are `ERROR` leaves and nothing separates them.
pub(crate) fn join_errors(first: &SubtreeData, next: &SubtreeData) -> Option<Subtree> {
    let leaves = first.is_error() && next.is_error() && first.children.is_empty() && next.children.is_empty();
    if !leaves || next.padding.bytes != 0 {
        return None;
    }
    Some(Arc::new(SubtreeData {
        size: first.size + next.size,
        lookahead_bytes: next.lookahead_bytes,
        ..first.clone()
    }))
}
