//! Per-symbol code table derived from a Huffman tree.

use std::ops::Index;

use crate::error::{EncodeError, Result};
use crate::tree::{HuffmanTree, Node};

/// Longest code a table entry can hold.
pub const MAX_CODE_LENGTH: usize = 64;

/// A variable-length code. Bit `i` is the branch taken at depth `i`
/// (0 = left, 1 = right).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Code {
    pub bits: u64,
    pub length: u8,
}

impl Code {
    /// True if `self` is a proper-or-equal prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.length > other.length {
            return false;
        }
        let mask = if self.length as usize == MAX_CODE_LENGTH {
            u64::MAX
        } else {
            (1u64 << self.length) - 1
        };
        other.bits & mask == self.bits
    }
}

/// Codes for all 256 symbols; absent symbols have length 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Code; 256],
}

impl CodeTable {
    /// Depth-first walk assigning each leaf its root-to-leaf path.
    ///
    /// # Errors
    /// `EncodeError::CodeTooLong` if a leaf lies deeper than 64 levels.
    pub fn from_tree(tree: &HuffmanTree) -> Result<Self> {
        let mut table = Self {
            codes: [Code::default(); 256],
        };
        table.fill(tree.root(), 0, 0)?;
        Ok(table)
    }

    fn fill(&mut self, node: &Node, bits: u64, depth: usize) -> Result<()> {
        match node {
            Node::Leaf { symbol, .. } => {
                if depth > MAX_CODE_LENGTH {
                    return Err(EncodeError::CodeTooLong {
                        symbol: *symbol,
                        length: depth,
                    }
                    .into());
                }
                self.codes[*symbol as usize] = Code {
                    bits,
                    length: depth as u8,
                };
            }
            Node::Internal { left, right, .. } => {
                // Past 64 levels the bits no longer matter; the leaf check reports it
                let right_bits = if depth < MAX_CODE_LENGTH {
                    bits | (1u64 << depth)
                } else {
                    bits
                };
                self.fill(left, bits, depth + 1)?;
                self.fill(right, right_bits, depth + 1)?;
            }
        }
        Ok(())
    }

    pub fn get(&self, symbol: u8) -> Code {
        self.codes[symbol as usize]
    }

    /// `(symbol, code)` for every symbol with a nonzero-length code.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter(|(_, code)| code.length > 0)
            .map(|(symbol, code)| (symbol as u8, *code))
    }

    /// True if no assigned code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<(u8, Code)> = self.iter().collect();
        codes.iter().all(|(a_symbol, a)| {
            codes
                .iter()
                .all(|(b_symbol, b)| a_symbol == b_symbol || !a.is_prefix_of(b))
        })
    }
}

impl Index<u8> for CodeTable {
    type Output = Code;

    fn index(&self, symbol: u8) -> &Code {
        &self.codes[symbol as usize]
    }
}
