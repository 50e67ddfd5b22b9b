//! Error types for the huffc codec.
//!
//! All operations return structured errors rather than panicking. Every error
//! is terminal for the current run; nothing is retried.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a specific failure domain:
/// - Open: an input or output path could not be opened
/// - Bit I/O: reading bits past the end of the stream
/// - Header: the compressed stream does not start with the expected magic
/// - Queue: priority queue underflow during tree construction
/// - Tree: corrupted or truncated serialized tree
/// - Encode / Decode: failures specific to one direction of the pipeline
/// - I/O: any other failure of the underlying stream
#[derive(Debug, Error)]
pub enum Error {
    /// A file could not be opened for reading or writing
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bit I/O operation failed (e.g., reading past end of stream)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Compressed stream header is invalid
    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    /// Priority queue misuse during tree construction
    #[error("priority queue error: {0}")]
    Queue(#[from] QueueError),

    /// Serialized tree could not be rebuilt
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// Compression failed
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Decompression failed
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Stream I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// The underlying stream ended while a bit was still expected
    #[error("unexpected end of bit stream after {bits_read} bits")]
    UnexpectedEof { bits_read: u64 },

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Compressed header errors.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// Magic bytes do not match
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 2], actual: [u8; 2] },
}

/// Priority queue errors.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Extraction attempted on an empty queue
    #[error("extract from empty priority queue")]
    Underflow,
}

/// Tree reconstruction errors.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Header declares zero leaves, which cannot describe any tree
    #[error("leaf count is zero")]
    NoLeaves,

    /// Header declares one leaf; a lone-leaf root consumes no payload bits
    #[error("leaf count is one, a code tree needs at least two leaves")]
    SingleLeaf,

    /// An internal node tag was read with fewer than two nodes on the stack
    #[error("stack underflow at serialized node {node_index}")]
    StackUnderflow { node_index: u32 },

    /// No node remained on the stack once all nodes were read
    #[error("stack empty after reading {nodes} nodes")]
    EmptyStack { nodes: u32 },

    /// More than one node remained, so the nodes do not form a single tree
    #[error("{remaining} disconnected subtrees left after reading {nodes} nodes")]
    UnbalancedStack { remaining: usize, nodes: u32 },
}

/// Encoder errors.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The 32-bit size field cannot describe the input
    #[error("input of {size} bytes exceeds the 32-bit size field")]
    InputTooLarge { size: u64 },

    /// A leaf lies deeper than a 64-bit code can express
    #[error("code for symbol {symbol:#04x} needs {length} bits, maximum is 64")]
    CodeTooLong { symbol: u8, length: usize },
}

/// Decoder errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload ended before every declared byte was decoded
    #[error("payload truncated: decoded {decoded} of {expected} bytes")]
    Truncated { decoded: u32, expected: u32 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an open failure with the path that caused it.
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Open {
            path: path.into(),
            source,
        }
    }
}
