//! Compressed stream header.
//!
//! # Header Format
//!
//! ```text
//! +------------------+
//! | magic (16 bits)  |  'H' 'C'
//! +------------------+
//! | original_size(32)|  decompressed byte count
//! +------------------+
//! | leaf_count (16)  |  leaves in the serialized tree
//! +------------------+
//! ```
//!
//! Every field is written through the bit writer, LSB first, so the header
//! occupies exactly the first 8 bytes of the file.

use std::io::{Read, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::error::{HeaderError, Result};

/// Magic number for compressed files: "HC"
pub const MAGIC: [u8; 2] = [b'H', b'C'];

/// Size of the header in bits
pub const HEADER_BITS: u64 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Byte count of the decompressed payload
    pub original_size: u32,
    /// Number of leaves in the serialized tree
    pub leaf_count: u16,
}

impl Header {
    pub fn write<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        writer.write_u8(MAGIC[0])?;
        writer.write_u8(MAGIC[1])?;
        writer.write_u32(self.original_size)?;
        writer.write_u16(self.leaf_count)?;
        Ok(())
    }

    /// Read and validate a header. The magic is checked before the remaining
    /// fields are read.
    ///
    /// # Errors
    /// - `HeaderError::InvalidMagic` if the first two bytes are not "HC"
    /// - `BitIoError::UnexpectedEof` if the stream is shorter than a header
    pub fn read<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        let magic = [reader.read_u8()?, reader.read_u8()?];
        if magic != MAGIC {
            return Err(HeaderError::InvalidMagic {
                expected: MAGIC,
                actual: magic,
            }
            .into());
        }

        Ok(Self {
            original_size: reader.read_u32()?,
            leaf_count: reader.read_u16()?,
        })
    }
}
