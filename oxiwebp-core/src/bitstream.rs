//! Bit-level I/O for the VP8L bitstream.
//!
//! This module provides `BitWriter` and `BitReader` for writing and reading
//! data at the bit level. VP8L packs every field LSB-first: the first bit
//! written lands in the least significant bit of the first byte.
//!
//! Huffman codes are the one exception to plain LSB-first packing. Canonical
//! codes are assigned high-bit-first, so [`BitWriter::write_code`] reverses
//! the pattern before emitting it.
//!
//! # Example
//!
//! ```
//! use oxiwebp_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3);
//! writer.write_bits(0b1100, 4);
//! writer.align_byte();
//! let output = writer.into_bytes();
//!
//! let mut reader = BitReader::new(Cursor::new(&output));
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(4).unwrap(), 0b1100);
//! ```

use crate::error::{Result, WebpError};
use std::io::Read;

/// A bit-level reader that wraps any `Read` implementation.
///
/// `BitReader` keeps a 64-bit LSB-first buffer and refills it from the
/// underlying reader on demand.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Underlying reader.
    reader: R,
    /// Bit buffer (LSB-first).
    buffer: u64,
    /// Number of valid bits in buffer.
    bits_in_buffer: u8,
    /// Total bits read (for error reporting).
    total_bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new `BitReader` wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_read: 0,
        }
    }

    /// Consume this `BitReader` and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Get the total number of bits read so far.
    pub fn bits_read(&self) -> u64 {
        self.total_bits_read
    }

    /// Ensure at least `count` bits are available in the buffer.
    #[inline]
    fn fill_buffer(&mut self, count: u8) -> Result<()> {
        debug_assert!(count <= 57, "Cannot fill more than 57 bits at once");

        while self.bits_in_buffer < count {
            let bits_needed = count - self.bits_in_buffer;
            let bytes_needed = bits_needed.div_ceil(8).min(7) as usize;

            let mut temp_buf = [0u8; 8];
            match self.reader.read(&mut temp_buf[..bytes_needed]) {
                Ok(0) => return Err(WebpError::unexpected_eof(bytes_needed)),
                Ok(n) => {
                    for byte in temp_buf.iter().take(n) {
                        self.buffer |= (*byte as u64) << self.bits_in_buffer;
                        self.bits_in_buffer += 8;
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// Read up to 32 bits from the stream.
    ///
    /// The first bit read ends up in the LSB position of the result.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        if count == 0 {
            return Ok(0);
        }

        self.fill_buffer(count)?;

        let mask = (1u64 << count).wrapping_sub(1);
        let result = (self.buffer & mask) as u32;

        self.buffer >>= count;
        self.bits_in_buffer -= count;
        self.total_bits_read += count as u64;

        Ok(result)
    }

    /// Read up to 64 bits from the stream.
    pub fn read_bits_u64(&mut self, count: u8) -> Result<u64> {
        debug_assert!(count <= 64, "Cannot read more than 64 bits at once");

        if count <= 32 {
            return Ok(self.read_bits(count)? as u64);
        }

        let low = self.read_bits(32)? as u64;
        let high = self.read_bits(count - 32)? as u64;
        Ok(low | (high << 32))
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Align to the next byte boundary by discarding partial bits.
    pub fn align_to_byte(&mut self) {
        let remainder = self.bits_in_buffer % 8;
        if remainder > 0 {
            self.buffer >>= remainder;
            self.bits_in_buffer -= remainder;
            self.total_bits_read += remainder as u64;
        }
    }
}

/// A bit-level writer that accumulates into an in-memory byte buffer.
///
/// The VP8L payload has to be fully assembled before the RIFF sizes can be
/// written, so the writer owns its output instead of streaming to a sink.
/// Misuse (a bit count outside 1..=64, or a value wider than its count) is a
/// programming error and panics.
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    /// Completed bytes.
    bytes: Vec<u8>,
    /// Bit buffer (LSB-first), holds fewer than 8 bits between calls.
    buffer: u64,
    /// Number of bits in buffer.
    bits_in_buffer: u8,
    /// Total bits written.
    total_bits_written: u64,
}

impl BitWriter {
    /// Create a new, empty `BitWriter`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with pre-allocated byte capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Get the total number of bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Number of completed bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether no complete byte has been produced yet.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Completed bytes (pending bits are not included).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte-align and return the output buffer.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.align_byte();
        self.bytes
    }

    #[inline]
    fn flush_bytes(&mut self) {
        while self.bits_in_buffer >= 8 {
            self.bytes.push((self.buffer & 0xFF) as u8);
            self.buffer >>= 8;
            self.bits_in_buffer -= 8;
        }
    }

    #[inline]
    fn push_bits(&mut self, value: u64, count: u8) {
        debug_assert!(count <= 32);
        self.buffer |= value << self.bits_in_buffer;
        self.bits_in_buffer += count;
        self.total_bits_written += count as u64;
        self.flush_bytes();
    }

    /// Write the low `count` bits of `value`, LSB-first.
    ///
    /// # Panics
    ///
    /// Panics if `count` is not in `1..=64` or if `value` does not fit in
    /// `count` bits.
    #[inline]
    pub fn write_bits(&mut self, value: u64, count: u8) {
        assert!(
            (1..=64).contains(&count),
            "invalid bit count {count}: must be between 1 and 64"
        );
        assert!(
            count == 64 || value >> count == 0,
            "value {value:#x} does not fit in {count} bits"
        );

        if count > 32 {
            self.push_bits(value & 0xFFFF_FFFF, 32);
            self.push_bits(value >> 32, count - 32);
        } else {
            self.push_bits(value, count);
        }
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.push_bits(bit as u64, 1);
    }

    /// Write a canonical Huffman code of `depth` bits.
    ///
    /// The pattern is reversed so its most significant bit is emitted
    /// first. A depth of zero writes nothing.
    #[inline]
    pub fn write_code(&mut self, bits: u32, depth: u8) {
        if depth == 0 {
            return;
        }
        self.write_bits(reverse_bits(bits, depth) as u64, depth);
    }

    /// Pad the pending bits with zeros up to the next byte boundary.
    pub fn align_byte(&mut self) {
        if self.bits_in_buffer % 8 != 0 {
            let padding = 8 - (self.bits_in_buffer % 8);
            self.push_bits(0, padding);
        }
    }

    /// Byte-align, then append a zero byte if the length is odd.
    ///
    /// RIFF chunks must occupy an even number of bytes.
    pub fn pad_to_even(&mut self) {
        self.align_byte();
        if self.bytes.len() % 2 != 0 {
            self.bytes.push(0);
        }
    }
}

/// Reverse the low `length` bits of `code`.
#[inline]
pub fn reverse_bits(mut code: u32, length: u8) -> u32 {
    let mut reversed = 0u32;
    for _ in 0..length {
        reversed = (reversed << 1) | (code & 1);
        code >>= 1;
    }
    reversed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn test_bitreader_basic() {
        // 0b10110101 = 0xB5
        let data = vec![0xB5];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.read_bits(1).unwrap(), 1); // LSB first
        assert_eq!(reader.read_bits(1).unwrap(), 0);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
        assert_eq!(reader.read_bits(1).unwrap(), 0);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
        assert_eq!(reader.read_bits(1).unwrap(), 0);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
    }

    #[test]
    fn test_bitreader_multi_byte() {
        let data = vec![0xFF, 0x00];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.read_bits(4).unwrap(), 0xF);
        assert_eq!(reader.read_bits(8).unwrap(), 0x0F); // Crosses byte boundary
        assert_eq!(reader.read_bits(4).unwrap(), 0x0);
    }

    #[test]
    fn test_bitreader_eof() {
        let mut reader = BitReader::new(Cursor::new(vec![0x01]));
        reader.read_bits(8).unwrap();
        assert!(matches!(
            reader.read_bits(1),
            Err(WebpError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_bitwriter_basic() {
        let mut writer = BitWriter::new();
        for bit in [true, false, true, false, true, true, false, true] {
            writer.write_bit(bit);
        }
        assert_eq!(writer.into_bytes(), vec![0xB5]);
    }

    #[test]
    fn test_bitwriter_multi_bits() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3);
        writer.write_bits(0b11001, 5);
        // 3 bits: 101, 5 bits: 11001 -> 11001_101 = 0xCD
        assert_eq!(writer.into_bytes(), vec![0xCD]);
    }

    #[test]
    fn test_bitwriter_64_bits() {
        let mut writer = BitWriter::new();
        writer.write_bits(1, 1);
        writer.write_bits(u64::MAX, 64);
        assert_eq!(writer.bits_written(), 65);
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 9);
        assert!(bytes[..8].iter().all(|&b| b == 0xFF));
        assert_eq!(bytes[8], 0x01);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_bitwriter_value_too_wide() {
        let mut writer = BitWriter::new();
        writer.write_bits(4, 2);
    }

    #[test]
    #[should_panic(expected = "invalid bit count")]
    fn test_bitwriter_zero_count() {
        let mut writer = BitWriter::new();
        writer.write_bits(0, 0);
    }

    #[test]
    fn test_write_code_reversed() {
        // Canonical code 0b110 (3 bits) is emitted MSB first: 1, 1, 0.
        let mut writer = BitWriter::new();
        writer.write_code(0b110, 3);
        assert_eq!(writer.into_bytes(), vec![0b011]);

        // Depth zero writes nothing.
        let mut writer = BitWriter::new();
        writer.write_code(0, 0);
        assert_eq!(writer.bits_written(), 0);
    }

    #[test]
    fn test_align_and_pad() {
        let mut writer = BitWriter::new();
        writer.write_bits(0x2f, 8);
        writer.write_bits(1, 3);
        writer.align_byte();
        assert_eq!(writer.len(), 2);
        writer.write_bits(0xAB, 8);
        writer.pad_to_even();
        assert_eq!(writer.as_bytes(), &[0x2f, 0x01, 0xAB, 0x00]);
    }

    #[test]
    fn test_reverse_bits() {
        assert_eq!(reverse_bits(0b101, 3), 0b101);
        assert_eq!(reverse_bits(0b1100, 4), 0b0011);
        assert_eq!(reverse_bits(0b10101010, 8), 0b01010101);
    }

    proptest! {
        #[test]
        fn prop_roundtrip(fields in prop::collection::vec((any::<u64>(), 1u8..=64), 1..64)) {
            let mut writer = BitWriter::new();
            let fields: Vec<(u64, u8)> = fields
                .into_iter()
                .map(|(v, n)| if n == 64 { (v, n) } else { (v & ((1u64 << n) - 1), n) })
                .collect();
            for &(value, count) in &fields {
                writer.write_bits(value, count);
            }
            let total: u64 = fields.iter().map(|&(_, n)| n as u64).sum();
            prop_assert_eq!(writer.bits_written(), total);

            let bytes = writer.into_bytes();
            let mut reader = BitReader::new(Cursor::new(bytes));
            for &(value, count) in &fields {
                prop_assert_eq!(reader.read_bits_u64(count).unwrap(), value);
            }
        }
    }
}
