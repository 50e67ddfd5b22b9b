//! Compression pipeline.
//!
//! Two sequential passes over a seekable input:
//! 1. `fill_histogram` counts byte frequencies and rewinds the input
//! 2. `compress` writes header, serialized tree and the code of every byte
//!
//! # Example
//! ```
//! use huffc_core::{compress_bytes, decompress_bytes};
//!
//! let packed = compress_bytes(b"AAB").unwrap();
//! assert_eq!(&packed[..2], b"HC");
//! assert_eq!(decompress_bytes(&packed).unwrap(), b"AAB");
//! ```

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use crate::bitio::BitWriter;
use crate::code_table::CodeTable;
use crate::error::{EncodeError, Error, Result};
use crate::header::{Header, HEADER_BITS};
use crate::histogram::Histogram;
use crate::stats::{Direction, Stats};
use crate::tree::HuffmanTree;

const READ_CHUNK: usize = 8192;

/// Read the next chunk, retrying on interruption. Returns 0 at end of input.
fn read_chunk<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<usize> {
    loop {
        match input.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Count byte frequencies over the whole input, then rewind it.
///
/// The returned histogram is seeded (0x00 and 0xFF counted once extra).
///
/// # Returns
/// The histogram and the input length in bytes.
///
/// # Errors
/// `EncodeError::InputTooLarge` if the input does not fit the 32-bit size field.
pub fn fill_histogram<R: Read + Seek>(input: &mut R) -> Result<(Histogram, u32)> {
    let mut histogram = Histogram::seeded();
    let mut size: u64 = 0;
    let mut buf = [0u8; READ_CHUNK];

    loop {
        let n = read_chunk(input, &mut buf)?;
        if n == 0 {
            break;
        }
        histogram.add_all(&buf[..n]);
        size += n as u64;
    }

    let size = u32::try_from(size).map_err(|_| EncodeError::InputTooLarge { size })?;
    input.seek(SeekFrom::Start(0))?;

    debug!(
        size,
        distinct = histogram.distinct_symbols(),
        "histogram filled"
    );
    Ok((histogram, size))
}

/// Derive the per-symbol code table from a tree.
pub fn build_code_table(tree: &HuffmanTree) -> Result<CodeTable> {
    CodeTable::from_tree(tree)
}

/// Write header, serialized tree and payload.
///
/// The input is rewound and re-read in original order; each byte's code is
/// written bit 0 first.
///
/// # Errors
/// Fails with an `InvalidData` I/O error if the input no longer holds
/// exactly `size` bytes.
pub fn compress<W: Write, R: Read + Seek>(
    output: &mut BitWriter<W>,
    input: &mut R,
    size: u32,
    tree: &HuffmanTree,
    table: &CodeTable,
) -> Result<()> {
    Header {
        original_size: size,
        leaf_count: tree.leaf_count(),
    }
    .write(output)?;
    tree.write(output)?;

    input.seek(SeekFrom::Start(0))?;
    let mut buf = [0u8; READ_CHUNK];
    let mut encoded: u64 = 0;

    loop {
        let n = read_chunk(input, &mut buf)?;
        if n == 0 {
            break;
        }
        for &byte in &buf[..n] {
            let code = table[byte];
            output.write_bits(code.bits, code.length as usize)?;
        }
        encoded += n as u64;
    }

    if encoded != size as u64 {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("input changed between passes: {size} bytes counted, {encoded} encoded"),
        )));
    }

    debug!(size, bits = output.bits_written(), "payload written");
    Ok(())
}

/// Run the full pipeline from one stream to another.
///
/// # Returns
/// Stats for the run; `compressed_bytes` counts the padded final byte.
pub fn compress_stream<R: Read + Seek, W: Write>(input: &mut R, output: W) -> Result<(W, Stats)> {
    let mut stats = Stats::new(Direction::Compress);

    let (histogram, size) = fill_histogram(input)?;
    let tree = HuffmanTree::build(&histogram)?;
    let table = build_code_table(&tree)?;

    let mut writer = BitWriter::new(output);
    compress(&mut writer, input, size, &tree, &table)?;

    let total_bits = writer.bits_written();
    stats.uncompressed_bytes = size as u64;
    stats.compressed_bytes = total_bits.div_ceil(8);
    stats.leaf_count = tree.leaf_count();
    stats.tree_bits = 10 * tree.leaf_count() as u64 - 1;
    stats.payload_bits = total_bits - HEADER_BITS - stats.tree_bits;

    let output = writer.finish()?;
    Ok((output, stats))
}

/// Compress the file at `input` into a new file at `output`.
///
/// The input is opened first, so a missing input never creates an output.
pub fn compress_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<Stats> {
    let input = input.as_ref();
    let output = output.as_ref();

    let mut reader = BufReader::new(File::open(input).map_err(|e| Error::open(input, e))?);
    let file = File::create(output).map_err(|e| Error::open(output, e))?;

    let (_, stats) = compress_stream(&mut reader, io::BufWriter::new(file))?;
    debug!(
        input = %input.display(),
        output = %output.display(),
        compressed_bytes = stats.compressed_bytes,
        "file compressed"
    );
    Ok(stats)
}

/// Compress an in-memory buffer.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let (output, _) = compress_stream(&mut Cursor::new(data), Vec::new())?;
    Ok(output)
}
