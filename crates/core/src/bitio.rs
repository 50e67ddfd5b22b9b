//! Bit-level I/O over byte-oriented streams.
//!
//! This module provides BitWriter and BitReader for the compressed file
//! format. Both operate LSB-first: the first bit written lands in bit 0 of the
//! first byte, and multi-bit integers are emitted from their least
//! significant bit upward.
//!
//! # Padding Rules
//! - BitWriter: the final partial byte is zero-padded in its unused high bits
//! - BitReader: padding is indistinguishable from data (caller must know how
//!   many symbols to decode)
//!
//! # Example
//! ```
//! use huffc_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new(Vec::new());
//! writer.write_bit(true).unwrap();
//! writer.write_u8(b'H').unwrap();
//! let bytes = writer.finish().unwrap();
//!
//! let mut reader = BitReader::new(&bytes[..]);
//! assert!(reader.read_bit().unwrap());
//! assert_eq!(reader.read_u8().unwrap(), b'H');
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{BitIoError, Error, Result};

/// Writes bits LSB-first into an underlying byte stream.
///
/// # Invariants
/// - `bit_count` is always < 8 between calls
/// - bits of `byte` at positions >= `bit_count` are zero
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    /// Accumulator for the current partial byte
    byte: u8,
    /// Number of bits in `byte` (0-7)
    bit_count: u8,
    /// Total bits accepted so far, including the partial byte
    bits_written: u64,
}

impl BitWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and wrap it in a buffered bit writer.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::open(path, e))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> BitWriter<W> {
    /// Wrap a byte-oriented writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            byte: 0,
            bit_count: 0,
            bits_written: 0,
        }
    }

    /// Append a single bit, flushing the accumulator once it holds 8 bits.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.byte |= (bit as u8) << self.bit_count;
        self.bit_count += 1;
        self.bits_written += 1;

        if self.bit_count == 8 {
            let full = std::mem::take(&mut self.byte);
            self.bit_count = 0;
            self.inner.write_all(&[full])?;
        }

        Ok(())
    }

    /// Write the lowest `count` bits of `value`, bit 0 first.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        for i in 0..count {
            self.write_bit((value >> i) & 1 == 1)?;
        }

        Ok(())
    }

    pub fn write_u8(&mut self, x: u8) -> Result<()> {
        self.write_bits(x as u64, 8)
    }

    pub fn write_u16(&mut self, x: u16) -> Result<()> {
        self.write_bits(x as u64, 16)
    }

    pub fn write_u32(&mut self, x: u32) -> Result<()> {
        self.write_bits(x as u64, 32)
    }

    /// Total number of bits written (including the partial byte).
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Flush the partial byte (zero-padded) and the underlying writer.
    ///
    /// This consumes the writer and hands back the inner stream.
    pub fn finish(mut self) -> Result<W> {
        if self.bit_count > 0 {
            self.inner.write_all(&[self.byte])?;
            self.byte = 0;
            self.bit_count = 0;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Reads bits LSB-first from an underlying byte stream.
///
/// # Invariants
/// - `bit_position` is 8 when the current byte is exhausted or was never loaded
#[derive(Debug)]
pub struct BitReader<R: Read> {
    inner: R,
    /// Most recently loaded byte
    byte: u8,
    /// Next bit to hand out from `byte` (0-8)
    bit_position: u8,
    /// Total bits handed out so far
    bits_read: u64,
}

impl BitReader<BufReader<File>> {
    /// Open `path` for buffered bit reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::open(path, e))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> BitReader<R> {
    /// Wrap a byte-oriented reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            byte: 0,
            bit_position: 8,
            bits_read: 0,
        }
    }

    /// Read one bit, loading the next byte from the stream when needed.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` once the stream has no more bytes.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bit_position > 7 {
            let mut buf = [0u8; 1];
            match self.inner.read_exact(&mut buf) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(BitIoError::UnexpectedEof {
                        bits_read: self.bits_read,
                    }
                    .into());
                }
                Err(e) => return Err(e.into()),
            }
            self.byte = buf[0];
            self.bit_position = 0;
        }

        let bit = (self.byte >> self.bit_position) & 1 == 1;
        self.bit_position += 1;
        self.bits_read += 1;
        Ok(bit)
    }

    /// Read `count` bits and compose them LSB-first.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if the stream ends first
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut value = 0u64;
        for i in 0..count {
            if self.read_bit()? {
                value |= 1 << i;
            }
        }
        Ok(value)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bits(8)? as u8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.read_bits(16)? as u16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.read_bits(32)? as u32)
    }

    /// Total number of bits read so far.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Give back the underlying stream; any unread bits of the current byte are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }
}
