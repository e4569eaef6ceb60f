//! Walks the old tree in document order, offering subtrees for reuse.

use crate::length::Length;
use crate::tree::subtree::Subtree;

struct Frame<'t> {
    siblings: &'t [Subtree],
    index: usize,
    /// Padding start of `siblings[index]`.
    position: Length,
}

pub(super) struct ReusableNode<'t> {
    stack: Vec<Frame<'t>>,
}

impl<'t> ReusableNode<'t> {
    /// Start at the first child of `root`. The root itself is never reused.
    pub fn new(root: &'t Subtree) -> Self {
        Self {
            stack: vec![Frame {
                siblings: &root.children,
                index: 0,
                position: Length::ZERO,
            }],
        }
    }

    /// Current candidate and its padding start.
    pub fn current(&self) -> Option<(&'t Subtree, Length)> {
        let frame = self.stack.last()?;
        let node = frame.siblings.get(frame.index)?;
        Some((node, frame.position))
    }

    /// Skip past the current candidate, climbing out of finished child
    /// lists.
    pub fn advance(&mut self) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        if let Some(node) = frame.siblings.get(frame.index) {
            frame.position += node.total();
            frame.index += 1;
        }
        while self.stack.len() > 1 {
            let Some(frame) = self.stack.last() else {
                return;
            };
            if frame.index < frame.siblings.len() {
                return;
            }
            self.stack.pop();
            if let Some(parent) = self.stack.last_mut() {
                if let Some(node) = parent.siblings.get(parent.index) {
                    parent.position += node.total();
                    parent.index += 1;
                }
            }
        }
    }

    /// Move to the first child of the current candidate. False for leaves.
    pub fn descend(&mut self) -> bool {
        let Some((node, position)) = self.current() else {
            return false;
        };
        if node.children.is_empty() {
            return false;
        }
        self.stack.push(Frame {
            siblings: &node.children,
            index: 0,
            position,
        });
        true
    }
}
