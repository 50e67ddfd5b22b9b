//! Decompression pipeline.
//!
//! Reads and validates the header, rebuilds the tree from its post-order
//! serialization, then walks the tree once per output byte.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::bitio::BitReader;
use crate::error::{BitIoError, DecodeError, Error, Result};
use crate::header::{Header, HEADER_BITS};
use crate::stats::{Direction, Stats};
use crate::tree::HuffmanTree;

const WRITE_CHUNK: usize = 8192;

/// Decode a complete compressed stream into `output`.
///
/// Bits after the last declared symbol (the zero padding) are ignored.
///
/// # Returns
/// The header that was read.
///
/// # Errors
/// - `HeaderError::InvalidMagic` before anything else is parsed
/// - `TreeError::*` or `BitIoError::UnexpectedEof` for a corrupt or truncated tree
/// - `DecodeError::Truncated` if the payload ends early; bytes already
///   written to `output` are not meaningful in that case
pub fn decompress<R: Read, W: Write>(input: &mut BitReader<R>, output: &mut W) -> Result<Header> {
    let header = Header::read(input)?;
    debug!(
        original_size = header.original_size,
        leaf_count = header.leaf_count,
        "header read"
    );

    let tree = HuffmanTree::read(input, header.leaf_count)?;

    let mut chunk = Vec::with_capacity(WRITE_CHUNK);
    for decoded in 0..header.original_size {
        let symbol = match tree.decode_symbol(input) {
            Ok(symbol) => symbol,
            Err(Error::BitIo(BitIoError::UnexpectedEof { .. })) => {
                output.write_all(&chunk)?;
                return Err(DecodeError::Truncated {
                    decoded,
                    expected: header.original_size,
                }
                .into());
            }
            Err(e) => return Err(e),
        };

        chunk.push(symbol);
        if chunk.len() == WRITE_CHUNK {
            output.write_all(&chunk)?;
            chunk.clear();
        }
    }
    output.write_all(&chunk)?;
    output.flush()?;

    debug!(
        bytes = header.original_size,
        bits = input.bits_read(),
        "payload decoded"
    );
    Ok(header)
}

/// Run the full pipeline from one stream to another.
pub fn decompress_stream<R: Read, W: Write>(input: R, output: &mut W) -> Result<Stats> {
    let mut stats = Stats::new(Direction::Decompress);
    let mut reader = BitReader::new(input);

    let header = decompress(&mut reader, output)?;

    let total_bits = reader.bits_read();
    stats.uncompressed_bytes = header.original_size as u64;
    stats.compressed_bytes = total_bits.div_ceil(8);
    stats.leaf_count = header.leaf_count;
    stats.tree_bits = 10 * header.leaf_count as u64 - 1;
    stats.payload_bits = total_bits - HEADER_BITS - stats.tree_bits;
    Ok(stats)
}

/// Decompress the file at `input` into a new file at `output`.
///
/// The input is opened first, so a missing input never creates an output.
pub fn decompress_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<Stats> {
    let input = input.as_ref();
    let output = output.as_ref();

    let reader = BufReader::new(File::open(input).map_err(|e| Error::open(input, e))?);
    let file = File::create(output).map_err(|e| Error::open(output, e))?;
    let mut writer = BufWriter::new(file);

    let stats = decompress_stream(reader, &mut writer)?;
    writer.flush()?;

    debug!(
        input = %input.display(),
        output = %output.display(),
        bytes = stats.uncompressed_bytes,
        "file decompressed"
    );
    Ok(stats)
}

/// Decompress an in-memory buffer.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decompress(&mut BitReader::new(data), &mut output)?;
    Ok(output)
}
