//! Run statistics for compression and decompression.
//!
//! A `Stats` value is returned by the file-level entry points so front ends
//! can report sizes and space saving (the `-v` output of `huff`/`dehuff`).
//!
//! # Thread Safety
//!
//! `Stats` is a plain value; one instance per run.

/// Which direction a run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Compress,
    Decompress,
}

/// Sizes for one codec run.
#[derive(Debug, Clone)]
pub struct Stats {
    pub direction: Direction,

    // === Sizes ===
    /// Size of the original (decompressed) data
    pub uncompressed_bytes: u64,

    /// Size of the compressed file, header and padding included
    pub compressed_bytes: u64,

    // === Tree ===
    /// Leaves in the code tree
    pub leaf_count: u16,

    /// Bits spent on the serialized tree
    pub tree_bits: u64,

    /// Bits spent on the encoded payload
    pub payload_bits: u64,
}

impl Stats {
    /// Create empty stats for a run in `direction`.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            uncompressed_bytes: 0,
            compressed_bytes: 0,
            leaf_count: 0,
            tree_bits: 0,
            payload_bits: 0,
        }
    }

    /// Compression ratio (compressed / uncompressed).
    ///
    /// Returns 0.0 for an empty original.
    pub fn compression_ratio(&self) -> f64 {
        if self.uncompressed_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.uncompressed_bytes as f64
        }
    }

    /// Space saving in percent: `100 * (1 - compressed / uncompressed)`.
    ///
    /// Negative when the output is larger than the input.
    pub fn space_saving(&self) -> f64 {
        if self.uncompressed_bytes == 0 {
            0.0
        } else {
            100.0 * (1.0 - self.compression_ratio())
        }
    }

    /// Human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Uncompressed file size: {} bytes\n\
             Compressed file size: {} bytes\n\
             Space saving: {:.2}%\n",
            self.uncompressed_bytes,
            self.compressed_bytes,
            self.space_saving(),
        )
    }

    /// Print the summary to stderr so it never mixes with piped output.
    pub fn print_summary(&self) {
        eprint!("{}", self.summary());
    }
}
