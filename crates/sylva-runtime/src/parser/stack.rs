//! The LR stack.

use sylva_table::StateId;

use crate::length::Length;
use crate::tree::subtree::Subtree;

#[derive(Clone, Debug)]
pub(super) struct Entry {
    /// State after pushing `node`. Extras keep the state below them.
    pub state: StateId,
    pub node: Subtree,
    /// Where the node's padding begins.
    pub position: Length,
}

impl Entry {
    pub fn end(&self) -> Length {
        self.position + self.node.total()
    }
}

/// Entries above the implicit start state 0.
#[derive(Debug, Default)]
pub(super) struct Stack {
    entries: Vec<Entry>,
}

impl Stack {
    pub fn state(&self) -> StateId {
        self.state_at(self.entries.len())
    }

    /// State exposed when only the bottom `depth` entries remain.
    pub fn state_at(&self, depth: usize) -> StateId {
        match depth.checked_sub(1).and_then(|i| self.entries.get(i)) {
            Some(entry) => entry.state,
            None => 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn top(&self) -> Option<&Entry> {
        self.entries.last()
    }

    pub fn push(&mut self, state: StateId, node: Subtree, position: Length) {
        self.entries.push(Entry {
            state,
            node,
            position,
        });
    }

    pub fn pop(&mut self) -> Option<Entry> {
        self.entries.pop()
    }

    /// Remove everything above `depth`.
    pub fn split_off(&mut self, depth: usize) -> Vec<Entry> {
        self.entries.split_off(depth.min(self.entries.len()))
    }

    /// Pop the entries a reduction consumes: trailing extras first, then
    /// `count` regular entries together with the extras between them.
    ///
    /// Returns `(children, trailing_extras)`, both in stack order.
    pub fn pop_children(&mut self, count: usize) -> (Vec<Entry>, Vec<Entry>) {
        let mut trailing = Vec::new();
        while self.entries.last().is_some_and(|entry| entry.node.extra) {
            trailing.extend(self.entries.pop());
        }
        trailing.reverse();

        let mut children = Vec::new();
        let mut remaining = count;
        while remaining > 0 {
            let Some(entry) = self.entries.pop() else {
                break;
            };
            if !entry.node.extra {
                remaining -= 1;
            }
            children.push(entry);
        }
        children.reverse();
        (children, trailing)
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}
