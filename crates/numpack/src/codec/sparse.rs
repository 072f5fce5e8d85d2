//! Bit-packed stream for data dominated by zeros.
//!
//! A zero costs a single `0` bit. Any other value starts with a `1` bit and
//! is stored as a chain of logical bytes laid down at the current bit
//! offset, MSB first:
//!
//! ```text
//!       value | byte0    | byte1    | byte2    | byte3    | byte4
//!  -----------+----------+----------+----------+----------+----------
//!           0 | 0        |          |          |          |
//!           1 | 10000001 |          |          |          |
//!          63 | 10111111 |          |          |          |
//!          64 | 11000000 | 00000001 |          |          |
//!          65 | 11000001 | 00000001 |          |          |
//!        8191 | 11111111 | 01111111 |          |          |
//!        8192 | 11000000 | 10000000 | 00000001 |          |
//!     1048575 | 11111111 | 11111111 | 01111111 |          |
//!     1048576 | 11000000 | 10000000 | 10000000 | 00000001 |
//!  0xFFFFFFFF | 11111111 | 11111111 | 11111111 | 11111111 | 00011111
//! ```
//!
//! The first byte holds the nonzero flag (bit 7), a continuation bit (bit 6)
//! and the 6 low value bits. Each following byte holds a continuation bit
//! (bit 7) and the next 7 value bits.
//!
//! When the bit offset is not zero, one logical byte straddles two physical
//! bytes: the high `8 - offset` bits land in the current byte, the low
//! `offset` bits at the top of the next.

use crate::buffer::GrowableBuffer;
use crate::codec::stream::{ReadStream, WriteStream, WriterOptions};
use crate::error::DecodeError;
use crate::limits::{MAX_SPARSE_LEN, PAYLOAD_BITS, SPARSE_FIRST_PAYLOAD_BITS};

const NONZERO_FLAG: u8 = 0x80;
const FIRST_CONTINUATION: u8 = 0x40;
const FIRST_PAYLOAD_MASK: u32 = 0x3F;
const CONTINUATION: u8 = 0x80;
const PAYLOAD_MASK: u32 = 0x7F;

/// Position of the next bit in a sparse stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitCursor {
    byte: usize,
    bit: u8,
}

impl BitCursor {
    /// Creates a cursor at bit `bit` (0 = most significant) of byte `byte`.
    ///
    /// # Panics
    ///
    /// Panics if `bit` is not below 8.
    pub fn new(byte: usize, bit: u8) -> Self {
        assert!(bit < 8, "bit offset {} out of range", bit);
        Self { byte, bit }
    }

    /// Returns the physical byte index.
    #[inline]
    pub fn byte(&self) -> usize {
        self.byte
    }

    /// Returns the bit offset within the byte, in `[0, 8)`.
    #[inline]
    pub fn bit(&self) -> u8 {
        self.bit
    }

    /// Returns true if the cursor sits on a byte boundary.
    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.bit == 0
    }

    /// Returns the absolute bit index.
    pub fn bit_position(&self) -> usize {
        self.byte * 8 + self.bit as usize
    }

    /// Advances one bit. Returns true if that rolled into the next byte.
    #[inline]
    pub fn advance_bit(&mut self) -> bool {
        self.bit += 1;
        if self.bit == 8 {
            self.bit = 0;
            self.byte += 1;
            true
        } else {
            false
        }
    }

    /// Advances one whole byte, keeping the bit offset.
    #[inline]
    pub fn advance_byte(&mut self) {
        self.byte += 1;
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for the sparse format.
///
/// Invariant: the byte under the cursor always exists in the buffer, and
/// its bits at and after the bit offset are zero, so partial writes can be
/// OR-ed in. The buffer only grows when the cursor crosses into a new byte.
#[derive(Debug, Clone)]
pub struct SparseWriter {
    buffer: GrowableBuffer,
    bit: u8,
}

impl Default for SparseWriter {
    fn default() -> Self {
        Self::with_options(WriterOptions::default())
    }
}

impl SparseWriter {
    /// Creates a writer with the default initial capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer whose buffer starts at `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buffer = GrowableBuffer::with_capacity(capacity);
        buffer.ensure(1);
        Self { buffer, bit: 0 }
    }

    /// Creates a writer with the given options.
    pub fn with_options(options: WriterOptions) -> Self {
        Self::with_capacity(options.initial_capacity)
    }

    /// Returns the write cursor.
    pub fn cursor(&self) -> BitCursor {
        BitCursor::new(self.buffer.position(), self.bit)
    }

    /// Returns the number of bytes holding written bits, counting a
    /// partially filled last byte.
    pub fn len(&self) -> usize {
        self.buffer.position() + (self.bit > 0) as usize
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current buffer capacity.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Pads the cursor to the next byte boundary and returns the byte
    /// position, which a reader can later be positioned at.
    pub fn align(&mut self) -> usize {
        if self.bit > 0 {
            self.buffer.advance();
            self.buffer.store_current(0);
            self.bit = 0;
        }
        self.buffer.position()
    }

    /// Aligns, then moves the cursor to byte `position`.
    pub fn set_position(&mut self, position: usize) {
        self.align();
        self.buffer.set_position(position);
        self.buffer.ensure(1);
    }

    /// Returns the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.prefix(self.len())
    }

    /// Consumes the writer, returning the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        let len = self.len();
        self.buffer.into_prefix(len)
    }

    /// Writes a zero as a single `0` bit.
    pub fn write_zero(&mut self) {
        if self.bit == 0 {
            self.buffer.store_current(0);
        }
        self.bit += 1;
        if self.bit == 8 {
            self.buffer.advance();
            self.buffer.store_current(0);
            self.bit = 0;
        }
    }

    /// Writes one logical byte at the current bit offset.
    #[inline]
    fn write_byte_bits(&mut self, byte: u8) {
        if self.bit == 0 {
            self.buffer.store_current(byte);
        } else {
            self.buffer.merge_current(byte >> self.bit);
        }
        self.buffer.advance();
        if self.bit > 0 {
            self.buffer.store_current(byte << (8 - self.bit));
        }
    }
}

impl WriteStream for SparseWriter {
    fn write_uint32(&mut self, value: u32) {
        if value == 0 {
            self.write_zero();
            return;
        }
        let mut next = value >> SPARSE_FIRST_PAYLOAD_BITS;
        let continuation = if next != 0 { FIRST_CONTINUATION } else { 0 };
        self.write_byte_bits(NONZERO_FLAG | continuation | (value & FIRST_PAYLOAD_MASK) as u8);
        while next != 0 {
            let continuation = if next >> PAYLOAD_BITS != 0 { CONTINUATION } else { 0 };
            self.write_byte_bits(continuation | (next & PAYLOAD_MASK) as u8);
            next >>= PAYLOAD_BITS;
        }
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Reader for the sparse format.
#[derive(Debug, Clone)]
pub struct SparseReader<'a> {
    data: &'a [u8],
    cursor: BitCursor,
}

impl<'a> SparseReader<'a> {
    /// Creates a reader at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            cursor: BitCursor::default(),
        }
    }

    /// Creates a reader at byte `position`, bit offset 0.
    pub fn with_position(data: &'a [u8], position: usize) -> Self {
        Self {
            data,
            cursor: BitCursor::new(position, 0),
        }
    }

    /// Returns the read cursor.
    pub fn cursor(&self) -> BitCursor {
        self.cursor
    }

    /// Returns the byte position of the read cursor.
    pub fn position(&self) -> usize {
        self.cursor.byte()
    }

    /// Moves the cursor to byte `position` and resets the bit offset.
    pub fn set_position(&mut self, position: usize) {
        self.cursor = BitCursor::new(position, 0);
    }

    /// Returns true if the cursor is past the last byte.
    pub fn is_empty(&self) -> bool {
        self.cursor.byte() >= self.data.len()
    }

    /// Consumes the next bit if it flags a zero value.
    ///
    /// Returns false, without consuming anything, if the next value is
    /// nonzero; its flag bit is part of its first logical byte.
    pub fn read_zero(&mut self) -> Result<bool, DecodeError> {
        let byte = self.byte_at(self.cursor.byte(), "zero flag")?;
        if byte & (NONZERO_FLAG >> self.cursor.bit()) != 0 {
            return Ok(false);
        }
        self.cursor.advance_bit();
        Ok(true)
    }

    #[inline]
    fn byte_at(&self, index: usize, context: &'static str) -> Result<u8, DecodeError> {
        self.data
            .get(index)
            .copied()
            .ok_or(DecodeError::UnexpectedEof { context })
    }

    /// Reads one logical byte at the current bit offset.
    #[inline]
    fn read_byte_bits(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        let index = self.cursor.byte();
        let bit = self.cursor.bit();
        let high = self.byte_at(index, context)?;
        let byte = if bit == 0 {
            high
        } else {
            let low = self.byte_at(index + 1, context)?;
            (high << bit) | (low >> (8 - bit))
        };
        self.cursor.advance_byte();
        Ok(byte)
    }
}

impl ReadStream for SparseReader<'_> {
    fn read_uint32(&mut self) -> Result<u32, DecodeError> {
        const CONTEXT: &str = "sparse value";

        if self.read_zero()? {
            return Ok(0);
        }

        let first = self.read_byte_bits(CONTEXT)?;
        let mut result = first as u32 & FIRST_PAYLOAD_MASK;
        let mut more = first & FIRST_CONTINUATION != 0;
        let mut shift = SPARSE_FIRST_PAYLOAD_BITS;
        let mut len = 1;

        while more {
            if len == MAX_SPARSE_LEN {
                return Err(DecodeError::VarintTooLong { context: CONTEXT });
            }
            let byte = self.read_byte_bits(CONTEXT)?;
            let value = byte as u32 & PAYLOAD_MASK;
            if shift + PAYLOAD_BITS > u32::BITS && value >> (u32::BITS - shift) != 0 {
                return Err(DecodeError::VarintOverflow { context: CONTEXT });
            }
            result |= value << shift;
            more = byte & CONTINUATION != 0;
            shift += PAYLOAD_BITS;
            len += 1;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::standard::StandardWriter;

    fn encode(value: u32) -> Vec<u8> {
        let mut writer = SparseWriter::new();
        writer.write_uint32(value);
        writer.into_bytes()
    }

    #[test]
    fn test_length_table() {
        let cases = [
            (1u32, 1usize),
            (63, 1),
            (64, 2),
            (8191, 2),
            (8192, 3),
            (1_048_575, 3),
            (1_048_576, 4),
            (134_217_727, 4),
            (134_217_728, 5),
            (u32::MAX, 5),
        ];
        for (value, expected) in cases {
            let bytes = encode(value);
            assert_eq!(bytes.len(), expected, "length of {}", value);
            let mut reader = SparseReader::new(&bytes);
            assert_eq!(reader.read_uint32().unwrap(), value);
        }
    }

    #[test]
    fn test_literal_encodings() {
        assert_eq!(encode(1), [0x81]);
        assert_eq!(encode(63), [0xBF]);
        assert_eq!(encode(65), [0b1100_0001, 0b0000_0001]);
        assert_eq!(encode(0xFF), [0xFF, 0x03]);
        assert_eq!(encode(0xFFFF), [0xFF, 0xFF, 0x07]);
        assert_eq!(encode(8192), [0xC0, 0x80, 0x01]);
        assert_eq!(encode(u32::MAX), [0xFF, 0xFF, 0xFF, 0xFF, 0x1F]);
    }

    #[test]
    fn test_zero_is_one_bit() {
        let mut writer = SparseWriter::new();
        for _ in 0..8 {
            writer.write_uint32(0);
        }
        assert_eq!(writer.cursor(), BitCursor::new(1, 0));
        assert_eq!(writer.as_bytes(), [0x00]);

        writer.write_zero();
        assert_eq!(writer.len(), 2);
        assert_eq!(writer.cursor().bit_position(), 9);
    }

    #[test]
    fn test_zeros_then_value_straddles_bytes() {
        let mut writer = SparseWriter::new();
        for _ in 0..9 {
            writer.write_zero();
        }
        assert_eq!(writer.cursor(), BitCursor::new(1, 1));
        writer.write_uint32(1);
        let bytes = writer.into_bytes();
        assert_eq!(bytes, [0x00, 0x40, 0x80]);

        let mut reader = SparseReader::new(&bytes);
        for _ in 0..9 {
            assert_eq!(reader.read_uint32().unwrap(), 0);
        }
        assert_eq!(reader.cursor(), BitCursor::new(1, 1));
        assert_ne!(bytes[1] & (0x80 >> 1), 0, "nonzero flag at bit 1 of byte 1");
        assert!(!reader.read_zero().unwrap());
        assert_eq!(reader.cursor(), BitCursor::new(1, 1), "flag is not consumed");
        assert_eq!(reader.read_uint32().unwrap(), 1);
        assert_eq!(reader.cursor(), BitCursor::new(2, 1));
    }

    #[test]
    fn test_unaligned_multibyte_values() {
        let values = [0u32, 65, 0, 0, 8192, u32::MAX, 0, 1, 0x1234_5678, 0, 0, 0];
        for offset in 0..8 {
            let mut writer = SparseWriter::with_capacity(1);
            for _ in 0..offset {
                writer.write_zero();
            }
            for v in values {
                writer.write_uint32(v);
            }
            let bytes = writer.into_bytes();

            let mut reader = SparseReader::new(&bytes);
            for _ in 0..offset {
                assert!(reader.read_zero().unwrap());
            }
            for v in values {
                assert_eq!(reader.read_uint32().unwrap(), v, "offset {}", offset);
            }
        }
    }

    #[test]
    fn test_mixed_sequence() {
        let mut writer = SparseWriter::with_capacity(0);
        for i in 0..10_000i32 {
            writer.write_uint32(i as u32);
            writer.write_bool(i % 3 == 0);
            writer.write_byte(i as u8);
            writer.write_signed_int(-i);
            writer.write_double(i as f64);
            writer.write_long(i as i64);
            writer.write_float(i as f32 * 0.25);
        }
        let bytes = writer.into_bytes();

        let mut reader = SparseReader::new(&bytes);
        for i in 0..10_000i32 {
            assert_eq!(reader.read_uint32().unwrap(), i as u32);
            assert_eq!(reader.read_bool().unwrap(), i % 3 == 0);
            assert_eq!(reader.read_byte().unwrap(), i as u8);
            assert_eq!(reader.read_signed_int().unwrap(), -i);
            assert_eq!(reader.read_double().unwrap(), i as f64);
            assert_eq!(reader.read_long().unwrap(), i as i64);
            assert_eq!(reader.read_float().unwrap(), i as f32 * 0.25);
        }
    }

    #[test]
    fn test_special_floats_are_bit_exact() {
        let nan = f32::from_bits(0x7F80_0ABC);
        let wide_nan = f64::from_bits(0xFFF4_0000_0000_0001);
        let mut writer = SparseWriter::new();
        writer.write_float(0.0);
        writer.write_float(-0.0);
        writer.write_float(nan);
        writer.write_double(-0.0);
        writer.write_double(wide_nan);
        let bytes = writer.into_bytes();

        let mut reader = SparseReader::new(&bytes);
        assert_eq!(reader.read_float().unwrap().to_bits(), 0);
        assert_eq!(reader.read_float().unwrap().to_bits(), 0x8000_0000);
        assert_eq!(reader.read_float().unwrap().to_bits(), nan.to_bits());
        assert_eq!(reader.read_double().unwrap().to_bits(), 0x8000_0000_0000_0000);
        assert_eq!(reader.read_double().unwrap().to_bits(), wide_nan.to_bits());
    }

    #[test]
    fn test_growth_preserves_prefix() {
        let write_all = |writer: &mut SparseWriter| {
            for i in 0..2_000u32 {
                if i % 5 == 0 {
                    writer.write_uint32(i.wrapping_mul(2_654_435_761));
                } else {
                    writer.write_zero();
                }
            }
        };

        let mut tiny = SparseWriter::with_capacity(1);
        write_all(&mut tiny);
        let mut roomy = SparseWriter::with_capacity(1 << 16);
        write_all(&mut roomy);

        assert!(tiny.capacity() < roomy.capacity());
        assert_eq!(tiny.as_bytes(), roomy.as_bytes());

        let mut writer = SparseWriter::with_capacity(1);
        writer.write_zero();
        writer.write_uint32(8192);
        let prefix = writer.buffer.snapshot().to_vec();
        for _ in 0..50 {
            writer.write_uint32(u32::MAX);
        }
        assert_eq!(&writer.as_bytes()[..prefix.len()], prefix.as_slice());
    }

    #[test]
    fn test_rewind_zeroes_stale_bytes() {
        let mut writer = SparseWriter::new();
        for _ in 0..3 {
            writer.write_uint32(u32::MAX);
        }
        writer.set_position(0);
        for _ in 0..3 {
            writer.write_zero();
        }
        writer.write_uint32(1);
        assert_eq!(writer.as_bytes(), [0x10, 0x20]);

        let bytes = writer.into_bytes();
        let mut reader = SparseReader::new(&bytes);
        let decoded: Vec<u32> = (0..4).map(|_| reader.read_uint32().unwrap()).collect();
        assert_eq!(decoded, [0, 0, 0, 1]);
    }

    #[test]
    fn test_align_and_reposition() {
        let mut writer = SparseWriter::new();
        writer.write_zero();
        writer.write_zero();
        writer.write_zero();
        let start = writer.align();
        assert_eq!(start, 1);
        assert!(writer.cursor().is_aligned());
        writer.write_uint32(1);
        assert_eq!(writer.align(), 2, "aligned cursor stays put");
        let bytes = writer.into_bytes();
        assert_eq!(bytes, [0x00, 0x81]);

        let mut reader = SparseReader::with_position(&bytes, start);
        assert_eq!(reader.read_uint32().unwrap(), 1);
        assert!(reader.is_empty());
        reader.set_position(0);
        assert!(reader.read_zero().unwrap());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_formats_differ() {
        let mut standard = StandardWriter::new();
        standard.write_uint32(1);
        assert_eq!(standard.as_bytes(), [0x01]);
        assert_eq!(encode(1), [0x81]);
    }

    #[test]
    fn test_truncated_input() {
        let bytes = encode(u32::MAX);
        let mut reader = SparseReader::new(&bytes[..4]);
        assert!(matches!(
            reader.read_uint32(),
            Err(DecodeError::UnexpectedEof { context: "sparse value" })
        ));

        let mut reader = SparseReader::new(&[]);
        assert!(matches!(
            reader.read_zero(),
            Err(DecodeError::UnexpectedEof { context: "zero flag" })
        ));
    }

    #[test]
    fn test_malformed_chain() {
        let mut reader = SparseReader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert!(matches!(reader.read_uint32(), Err(DecodeError::VarintOverflow { .. })));

        let mut reader = SparseReader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0x9F, 0x01]);
        assert!(matches!(reader.read_uint32(), Err(DecodeError::VarintTooLong { .. })));
    }

    #[test]
    fn test_bit_cursor() {
        let mut cursor = BitCursor::default();
        for _ in 0..7 {
            assert!(!cursor.advance_bit());
        }
        assert!(cursor.advance_bit());
        assert_eq!(cursor, BitCursor::new(1, 0));
        cursor.advance_bit();
        cursor.advance_byte();
        assert_eq!(cursor.byte(), 2);
        assert_eq!(cursor.bit(), 1);
        assert_eq!(cursor.bit_position(), 17);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_bit_cursor_rejects_offset() {
        BitCursor::new(0, 8);
    }
}
