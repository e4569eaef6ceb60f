use sylva_table::FieldId;

use super::node::Node;

#[derive(Clone, Copy)]
struct Frame<'t> {
    node: Node<'t>,
    field: Option<FieldId>,
    /// Index among the parent's stored children, hidden ones included.
    index: usize,
}

/// A stateful walker over visible nodes, starting at some node and never
/// leaving its subtree.
#[derive(Clone)]
pub struct TreeCursor<'t> {
    stack: Vec<Frame<'t>>,
}

impl<'t> TreeCursor<'t> {
    pub(crate) fn new(node: Node<'t>) -> Self {
        Self {
            stack: vec![Frame {
                node,
                field: None,
                index: 0,
            }],
        }
    }

    fn top(&self) -> &Frame<'t> {
        &self.stack[self.stack.len() - 1]
    }

    pub fn node(&self) -> Node<'t> {
        self.top().node
    }

    pub fn field_id(&self) -> Option<FieldId> {
        self.top().field
    }

    pub fn field_name(&self) -> Option<&'t str> {
        let node = self.node();
        node.tree().table().field_name(self.field_id()?)
    }

    /// Distance from the node the cursor started at.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn reset(&mut self, node: Node<'t>) {
        *self = Self::new(node);
    }

    pub fn goto_first_child(&mut self) -> bool {
        let parent = self.node();
        let found = parent
            .raw_children()
            .enumerate()
            .find(|(_, (child, _))| child.is_visible());
        match found {
            Some((index, (node, field))) => {
                self.stack.push(Frame { node, field, index });
                true
            }
            None => false,
        }
    }

    /// Move to the first child that ends after `byte`, returning its index
    /// among the visible children.
    pub fn goto_first_child_for_byte(&mut self, byte: u32) -> Option<usize> {
        let parent = self.node();
        let (visible_index, (index, (node, field))) = parent
            .raw_children()
            .enumerate()
            .filter(|(_, (child, _))| child.is_visible())
            .enumerate()
            .find(|(_, (_, (child, _)))| child.end_byte() > byte)?;
        self.stack.push(Frame { node, field, index });
        Some(visible_index)
    }

    pub fn goto_next_sibling(&mut self) -> bool {
        if self.stack.len() < 2 {
            return false;
        }
        let current = *self.top();
        let parent = self.stack[self.stack.len() - 2].node;
        let found = parent
            .raw_children()
            .enumerate()
            .skip(current.index + 1)
            .find(|(_, (child, _))| child.is_visible());
        match found {
            Some((index, (node, field))) => {
                let top = self.stack.len() - 1;
                self.stack[top] = Frame { node, field, index };
                true
            }
            None => false,
        }
    }

    pub fn goto_prev_sibling(&mut self) -> bool {
        if self.stack.len() < 2 {
            return false;
        }
        let current = *self.top();
        let parent = self.stack[self.stack.len() - 2].node;
        let found = parent
            .raw_children()
            .enumerate()
            .take(current.index)
            .filter(|(_, (child, _))| child.is_visible())
            .last();
        match found {
            Some((index, (node, field))) => {
                let top = self.stack.len() - 1;
                self.stack[top] = Frame { node, field, index };
                true
            }
            None => false,
        }
    }

    pub fn goto_parent(&mut self) -> bool {
        if self.stack.len() < 2 {
            return false;
        }
        self.stack.pop();
        true
    }
}
