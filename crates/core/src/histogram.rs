//! Byte frequency histogram.

use std::ops::Index;

/// Symbols that are always counted once so every tree has at least two leaves.
pub const SEED_SYMBOLS: [u8; 2] = [0x00, 0xFF];

/// Occurrence count for each of the 256 byte values.
///
/// # Invariants
/// - A histogram built with [`Histogram::seeded`] always has at least two
///   nonzero entries (0x00 and 0xFF)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u32; 256],
}

impl Histogram {
    /// All-zero histogram.
    pub fn empty() -> Self {
        Self { counts: [0; 256] }
    }

    /// Histogram with the seed symbols pre-counted once each.
    pub fn seeded() -> Self {
        let mut histogram = Self::empty();
        for &symbol in &SEED_SYMBOLS {
            histogram.counts[symbol as usize] += 1;
        }
        histogram
    }

    /// Seeded histogram over an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut histogram = Self::seeded();
        histogram.add_all(data);
        histogram
    }

    pub fn add(&mut self, symbol: u8) {
        let count = &mut self.counts[symbol as usize];
        *count = count.saturating_add(1);
    }

    pub fn add_all(&mut self, data: &[u8]) {
        for &byte in data {
            self.add(byte);
        }
    }

    pub fn count(&self, symbol: u8) -> u32 {
        self.counts[symbol as usize]
    }

    /// Number of symbols with a nonzero count.
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Nonzero `(symbol, count)` pairs in ascending symbol order.
    pub fn nonzero(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Index<u8> for Histogram {
    type Output = u32;

    fn index(&self, symbol: u8) -> &u32 {
        &self.counts[symbol as usize]
    }
}
