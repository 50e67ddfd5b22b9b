//! Minimum-weight-first priority queue of partial Huffman trees.
//!
//! # Ordering
//!
//! Subtrees are kept in a list sorted by `(weight, representative symbol)`.
//! The representative symbol of a leaf is its own symbol; an internal node
//! always represents as `0x00` (see [`Node::symbol`]).
//!
//! Insertion places a subtree before the head only if it is strictly
//! smaller. Otherwise it goes right after the last entry, counting from the
//! head, that is strictly smaller than it. A subtree whose key equals the
//! head's therefore lands after the head but ahead of any later equal
//! entries. The compressed format depends on this exact placement: the same
//! histogram must always merge the same subtrees in the same order.

use std::collections::VecDeque;

use crate::error::QueueError;
use crate::tree::Node;

fn key(node: &Node) -> (u64, u8) {
    (node.weight(), node.symbol())
}

fn less_than(a: &Node, b: &Node) -> bool {
    key(a) < key(b)
}

/// Ordered collection of subtrees used while building a Huffman tree.
#[derive(Debug, Default)]
pub struct PriorityQueue {
    list: VecDeque<Node>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a subtree at its sorted position.
    pub fn insert(&mut self, node: Node) {
        let Some(head) = self.list.front() else {
            self.list.push_back(node);
            return;
        };
        if less_than(&node, head) {
            self.list.push_front(node);
            return;
        }

        let mut position = 1;
        while position < self.list.len() && less_than(&self.list[position], &node) {
            position += 1;
        }
        self.list.insert(position, node);
    }

    /// Remove and return the subtree at the head.
    ///
    /// # Errors
    /// `QueueError::Underflow` if the queue is empty.
    pub fn extract_min(&mut self) -> Result<Node, QueueError> {
        self.list.pop_front().ok_or(QueueError::Underflow)
    }

    /// True when exactly one subtree remains.
    pub fn size_is_one(&self) -> bool {
        self.list.len() == 1
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Render every pending subtree in extraction order, separated by rules.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, node) in self.list.iter().enumerate() {
            let rule = if i == 0 { '=' } else { '-' };
            out.extend(std::iter::repeat(rule).take(45));
            out.push('\n');
            node.render_into(&mut out);
        }
        out.extend(std::iter::repeat('=').take(45));
        out.push('\n');
        out
    }
}
