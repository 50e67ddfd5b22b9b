//! huffc-core: lossless file compression with Huffman coding
//!
//! This library provides the complete codec pipeline behind the `huff` and
//! `dehuff` tools:
//! - Counts byte frequencies over the whole input
//! - Builds a Huffman tree with a deterministic tie-break
//! - Embeds the tree in the output in a self-describing post-order form
//! - Encodes and decodes the payload bit by bit
//!
//! # Architecture
//!
//! - `bitio`: LSB-first bit reading/writing over byte streams
//! - `histogram`: seeded byte frequency table
//! - `queue`: minimum-weight-first priority queue of subtrees
//! - `tree`: Huffman tree build, serialization and stack-based rebuild
//! - `code_table`: per-symbol codes derived from a tree
//! - `header`: compressed stream header
//! - `encoder` / `decoder`: the two pipelines
//! - `stats`: sizes and space saving for a run
//!
//! # Design Principles
//!
//! - **No panics**: corrupt input produces structured errors
//! - **Deterministic**: the same input always compresses to the same bytes
//! - **Sequential**: single-threaded, one input and one output per run

pub mod bitio;
pub mod code_table;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod histogram;
pub mod queue;
pub mod stats;
pub mod tree;

// Re-export commonly used types
pub use decoder::{decompress, decompress_bytes, decompress_file, decompress_stream};
pub use encoder::{
    build_code_table, compress, compress_bytes, compress_file, compress_stream, fill_histogram,
};
pub use error::{Error, Result};
pub use stats::Stats;
pub use tree::HuffmanTree;
