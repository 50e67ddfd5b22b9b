//! Huffman tree construction, serialization and reconstruction.
//!
//! # Serialized Form
//!
//! The tree is written post-order so a decoder can rebuild it with a stack:
//!
//! ```text
//! leaf:      1 <symbol: 8 bits>
//! internal:  <left subtree> <right subtree> 0
//! ```
//!
//! A tree with L leaves always serializes to exactly 2L-1 node records.
//!
//! # Teardown
//!
//! Decoded trees come from untrusted input and may be arbitrarily deep (a
//! 16-bit leaf count allows chains of 65535 nodes), so trees and partially
//! rebuilt stacks are released with an explicit work list instead of
//! recursive drops.

use std::fmt;
use std::io::{Read, Write};

use tracing::{debug, trace};

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Result, TreeError};
use crate::histogram::Histogram;
use crate::queue::PriorityQueue;

/// A node of a Huffman tree.
///
/// Each internal node exclusively owns its two children.
#[derive(Debug, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn leaf(symbol: u8, weight: u64) -> Self {
        Node::Leaf { symbol, weight }
    }

    /// Merge two subtrees; the weight is the sum of theirs.
    pub fn internal(left: Node, right: Node) -> Self {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    /// Symbol used for queue tie-breaks: a leaf's own symbol, 0x00 for internal nodes.
    pub fn symbol(&self) -> u8 {
        match self {
            Node::Leaf { symbol, .. } => *symbol,
            Node::Internal { .. } => 0x00,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn left(&self) -> Option<&Node> {
        match self {
            Node::Internal { left, .. } => Some(left),
            Node::Leaf { .. } => None,
        }
    }

    pub fn right(&self) -> Option<&Node> {
        match self {
            Node::Internal { right, .. } => Some(right),
            Node::Leaf { .. } => None,
        }
    }

    /// Post-order serialization of this subtree.
    fn write<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        match self {
            Node::Leaf { symbol, .. } => {
                writer.write_bit(true)?;
                writer.write_u8(*symbol)?;
            }
            Node::Internal { left, right, .. } => {
                left.write(writer)?;
                right.write(writer)?;
                writer.write_bit(false)?;
            }
        }
        Ok(())
    }

    /// Sideways rendering: right subtree above, left subtree below.
    pub(crate) fn render_into(&self, out: &mut String) {
        self.render_at(out, '<', 2);
    }

    fn render_at(&self, out: &mut String, marker: char, indent: usize) {
        if let Some(right) = self.right() {
            right.render_at(out, '/', indent + 3);
        }

        out.push_str(&format!(
            "{:>width$}weight = {}",
            marker,
            self.weight(),
            width = indent + 1
        ));
        if let Node::Leaf { symbol, .. } = self {
            if (b' '..=b'~').contains(symbol) {
                out.push_str(&format!(", symbol = '{}'", *symbol as char));
            } else {
                out.push_str(&format!(", symbol = 0x{:02x}", symbol));
            }
        }
        out.push('\n');

        if let Some(left) = self.left() {
            left.render_at(out, '\\', indent + 3);
        }
    }
}

/// Release a subtree without recursing once per level.
fn release(root: Node) {
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        if let Node::Internal { left, right, .. } = node {
            pending.push(*left);
            pending.push(*right);
        }
    }
}

/// Node stack used while rebuilding a serialized tree.
struct RebuildStack(Vec<Node>);

impl Drop for RebuildStack {
    fn drop(&mut self) {
        for node in self.0.drain(..) {
            release(node);
        }
    }
}

/// A complete Huffman tree and its leaf count.
#[derive(Debug, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
    leaf_count: u16,
}

impl HuffmanTree {
    /// Build a tree by repeatedly merging the two lightest subtrees.
    ///
    /// Leaves are queued in ascending symbol order. Each merge takes `left`
    /// then `right` from the queue.
    ///
    /// Expects at least two nonzero symbols (a [`Histogram::seeded`]
    /// histogram always has them). A single symbol yields a one-leaf tree.
    ///
    /// # Errors
    /// `QueueError::Underflow` if the histogram is entirely zero.
    pub fn build(histogram: &Histogram) -> Result<Self> {
        let mut queue = PriorityQueue::new();
        for (symbol, count) in histogram.nonzero() {
            queue.insert(Node::leaf(symbol, count as u64));
        }

        let mut leaf_count: u16 = 1;
        while !queue.size_is_one() {
            let left = queue.extract_min()?;
            let right = queue.extract_min()?;
            queue.insert(Node::internal(left, right));
            leaf_count += 1;
        }
        let root = queue.extract_min()?;

        debug!(leaf_count, weight = root.weight(), "huffman tree built");
        Ok(Self { root, leaf_count })
    }

    /// Rebuild a tree of `leaf_count` leaves from its post-order serialization.
    ///
    /// Reads exactly `2 * leaf_count - 1` node records. An internal record
    /// pops its right child first, then its left child.
    ///
    /// # Errors
    /// - `TreeError::NoLeaves` if `leaf_count` is zero
    /// - `TreeError::SingleLeaf` if `leaf_count` is one
    /// - `TreeError::StackUnderflow` if an internal record finds fewer than two nodes
    /// - `TreeError::EmptyStack` / `TreeError::UnbalancedStack` if the records
    ///   do not end with exactly one tree
    /// - `BitIoError::UnexpectedEof` if the stream ends mid-tree
    pub fn read<R: Read>(reader: &mut BitReader<R>, leaf_count: u16) -> Result<Self> {
        match leaf_count {
            0 => return Err(TreeError::NoLeaves.into()),
            1 => return Err(TreeError::SingleLeaf.into()),
            _ => {}
        }

        let nodes = 2 * leaf_count as u32 - 1;
        let mut stack = RebuildStack(Vec::new());

        for node_index in 0..nodes {
            if reader.read_bit()? {
                let symbol = reader.read_u8()?;
                trace!(node_index, symbol, "leaf");
                stack.0.push(Node::leaf(symbol, 0));
            } else {
                let right = stack.0.pop();
                let left = stack.0.pop();
                match (left, right) {
                    (Some(left), Some(right)) => stack.0.push(Node::internal(left, right)),
                    (left, right) => {
                        left.into_iter().chain(right).for_each(release);
                        return Err(TreeError::StackUnderflow { node_index }.into());
                    }
                }
            }
        }

        match stack.0.len() {
            0 => Err(TreeError::EmptyStack { nodes }.into()),
            1 => {
                let root = stack.0.pop().ok_or(TreeError::EmptyStack { nodes })?;
                debug!(leaf_count, nodes, "huffman tree rebuilt");
                Ok(Self { root, leaf_count })
            }
            remaining => Err(TreeError::UnbalancedStack { remaining, nodes }.into()),
        }
    }

    /// Serialize the tree post-order.
    pub fn write<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        self.root.write(writer)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn leaf_count(&self) -> u16 {
        self.leaf_count
    }

    /// Total node count, counted without recursion.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![&self.root];
        while let Some(node) = pending.pop() {
            count += 1;
            if let Node::Internal { left, right, .. } = node {
                pending.push(left);
                pending.push(right);
            }
        }
        count
    }

    /// Walk from the root, one bit per branch (0 = left, 1 = right), and
    /// return the symbol of the leaf reached.
    pub fn decode_symbol<R: Read>(&self, reader: &mut BitReader<R>) -> Result<u8> {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { symbol, .. } => return Ok(*symbol),
                Node::Internal { left, right, .. } => {
                    node = if reader.read_bit()? { right } else { left };
                }
            }
        }
    }

    /// Sideways text rendering of the whole tree.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.root.render_into(&mut out);
        out
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Drop for HuffmanTree {
    fn drop(&mut self) {
        release(std::mem::replace(&mut self.root, Node::leaf(0, 0)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn serialize(tree: &HuffmanTree) -> Vec<u8> {
        let mut writer = BitWriter::new(Vec::new());
        tree.write(&mut writer).unwrap();
        writer.finish().unwrap()
    }

    fn leaves(node: &Node, out: &mut Vec<u8>) {
        match node {
            Node::Leaf { symbol, .. } => out.push(*symbol),
            Node::Internal { left, right, .. } => {
                leaves(left, out);
                leaves(right, out);
            }
        }
    }

    #[test]
    fn test_build_scenario_shape() {
        // 0x00:1, 0x41:2, 0x42:1, 0xFF:1
        let tree = HuffmanTree::build(&Histogram::from_bytes(b"AAB")).unwrap();
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.root().weight(), 5);

        // Merge 1: 0x00 + 0x42 (w=2, ranks before 0x41:2 on symbol 0x00).
        // Merge 2: 0xFF + that subtree (w=3). Merge 3: 0x41 + (w=3).
        let root = tree.root();
        let left = root.left().unwrap();
        let right = root.right().unwrap();
        assert!(left.is_leaf());
        assert_eq!(left.symbol(), 0x41);
        assert_eq!(right.weight(), 3);
        assert_eq!(right.left().unwrap().symbol(), 0xFF);

        let inner = right.right().unwrap();
        assert_eq!(inner.weight(), 2);
        assert_eq!(inner.left().unwrap().symbol(), 0x00);
        assert_eq!(inner.right().unwrap().symbol(), 0x42);
    }

    #[test]
    fn test_tree_size_invariant() {
        let mut histogram = Histogram::seeded();
        for (i, symbol) in (1u8..=200).enumerate() {
            for _ in 0..(i % 7 + 1) {
                histogram.add(symbol);
            }
        }
        let distinct = histogram.distinct_symbols();
        let tree = HuffmanTree::build(&histogram).unwrap();

        assert_eq!(tree.leaf_count() as usize, distinct);
        assert_eq!(tree.node_count(), 2 * distinct - 1);

        let mut symbols = Vec::new();
        leaves(tree.root(), &mut symbols);
        symbols.sort_unstable();
        let expected: Vec<u8> = histogram.nonzero().map(|(s, _)| s).collect();
        assert_eq!(symbols, expected);
    }

    #[test]
    fn test_build_empty_histogram_underflows() {
        let err = HuffmanTree::build(&Histogram::empty()).unwrap_err();
        assert!(matches!(err, Error::Queue(_)));
    }

    #[test]
    fn test_build_is_deterministic() {
        let histogram = Histogram::from_bytes(b"abracadabra, mississippi");
        let a = HuffmanTree::build(&histogram).unwrap();
        let b = HuffmanTree::build(&histogram).unwrap();
        assert_eq!(serialize(&a), serialize(&b));
    }

    #[test]
    fn test_serialize_two_leaves() {
        // Seeded only: 0x00 left, 0xFF right
        let tree = HuffmanTree::build(&Histogram::seeded()).unwrap();
        let bytes = serialize(&tree);

        let mut reader = BitReader::new(&bytes[..]);
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_u8().unwrap(), 0x00);
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_u8().unwrap(), 0xFF);
        assert!(!reader.read_bit().unwrap());
        // 19 bits -> 3 bytes
        assert_eq!(bytes.len(), 3);
    }

    #[test]
    fn test_serialized_tree_rebuilds() {
        let histogram = Histogram::from_bytes(b"the quick brown fox jumps over the lazy dog");
        let tree = HuffmanTree::build(&histogram).unwrap();
        let bytes = serialize(&tree);

        let mut reader = BitReader::new(&bytes[..]);
        let rebuilt = HuffmanTree::read(&mut reader, tree.leaf_count()).unwrap();

        assert_eq!(rebuilt.node_count(), tree.node_count());
        assert_eq!(serialize(&rebuilt), bytes);

        let mut original_leaves = Vec::new();
        let mut rebuilt_leaves = Vec::new();
        leaves(tree.root(), &mut original_leaves);
        leaves(rebuilt.root(), &mut rebuilt_leaves);
        assert_eq!(original_leaves, rebuilt_leaves);
    }

    #[test]
    fn test_read_zero_leaves() {
        let mut reader = BitReader::new(&[0u8; 4][..]);
        assert!(matches!(
            HuffmanTree::read(&mut reader, 0),
            Err(Error::Tree(TreeError::NoLeaves))
        ));
    }

    #[test]
    fn test_read_single_leaf() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bit(true).unwrap();
        writer.write_u8(b'Z').unwrap();
        let bytes = writer.finish().unwrap();

        let mut reader = BitReader::new(&bytes[..]);
        assert!(matches!(
            HuffmanTree::read(&mut reader, 1),
            Err(Error::Tree(TreeError::SingleLeaf))
        ));
    }

    #[test]
    fn test_read_stack_underflow() {
        // First record is an internal tag with nothing on the stack
        let mut reader = BitReader::new(&[0u8; 4][..]);
        assert!(matches!(
            HuffmanTree::read(&mut reader, 2),
            Err(Error::Tree(TreeError::StackUnderflow { node_index: 0 }))
        ));
    }

    #[test]
    fn test_read_unbalanced() {
        // Three leaf records for a declared two-leaf tree
        let mut writer = BitWriter::new(Vec::new());
        for symbol in [1u8, 2, 3] {
            writer.write_bit(true).unwrap();
            writer.write_u8(symbol).unwrap();
        }
        let bytes = writer.finish().unwrap();

        let mut reader = BitReader::new(&bytes[..]);
        assert!(matches!(
            HuffmanTree::read(&mut reader, 2),
            Err(Error::Tree(TreeError::UnbalancedStack { remaining: 3, nodes: 3 }))
        ));
    }

    #[test]
    fn test_read_truncated() {
        let tree = HuffmanTree::build(&Histogram::from_bytes(b"hello")).unwrap();
        let bytes = serialize(&tree);

        let mut reader = BitReader::new(&bytes[..1]);
        assert!(matches!(
            HuffmanTree::read(&mut reader, tree.leaf_count()),
            Err(Error::BitIo(_))
        ));
    }

    #[test]
    fn test_deep_chain_rebuild_and_drop() {
        // Left-leaning chain: leaf, then (leaf, internal) pairs
        let leaves_n: u16 = 20_000;
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bit(true).unwrap();
        writer.write_u8(0).unwrap();
        for i in 1..leaves_n {
            writer.write_bit(true).unwrap();
            writer.write_u8(i as u8).unwrap();
            writer.write_bit(false).unwrap();
        }
        let bytes = writer.finish().unwrap();

        let mut reader = BitReader::new(&bytes[..]);
        let tree = HuffmanTree::read(&mut reader, leaves_n).unwrap();
        assert_eq!(tree.node_count(), 2 * leaves_n as usize - 1);
        drop(tree);
    }

    #[test]
    fn test_decode_symbol_walks_bits() {
        let tree = HuffmanTree::build(&Histogram::from_bytes(b"AAB")).unwrap();
        // Bits in read order: 1, 1, 0 -> 0x00; then 0 -> 0x41; then 0 -> 0x41
        let mut reader = BitReader::new(&[0b0000_0011u8][..]);
        assert_eq!(tree.decode_symbol(&mut reader).unwrap(), 0x00);
        assert_eq!(tree.decode_symbol(&mut reader).unwrap(), 0x41);
        assert_eq!(tree.decode_symbol(&mut reader).unwrap(), 0x41);
    }

    #[test]
    fn test_render() {
        let tree = HuffmanTree::build(&Histogram::from_bytes(b"AAB")).unwrap();
        let text = tree.to_string();

        assert_eq!(text.lines().count(), 7);
        assert!(text.contains("symbol = 'A'"));
        assert!(text.contains("symbol = 0x00"));
        assert!(text.contains("symbol = 0xff"));
        // Root line carries the total weight at the shallowest indent
        assert!(text.contains("  <weight = 5\n"));
    }
}
