//! Byte-oriented stream over the unsigned varint.
//!
//! Every value occupies whole bytes: booleans and bytes are stored raw,
//! everything else goes through [`varint`](crate::codec::varint).

use crate::buffer::GrowableBuffer;
use crate::codec::stream::{ReadStream, WriteStream, WriterOptions};
use crate::codec::varint;
use crate::error::DecodeError;

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for the standard format.
#[derive(Debug, Clone, Default)]
pub struct StandardWriter {
    buffer: GrowableBuffer,
}

impl StandardWriter {
    /// Creates a writer with the default initial capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer whose buffer starts at `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: GrowableBuffer::with_capacity(capacity),
        }
    }

    /// Creates a writer with the given options.
    pub fn with_options(options: WriterOptions) -> Self {
        Self::with_capacity(options.initial_capacity)
    }

    /// Returns the number of bytes written.
    pub fn position(&self) -> usize {
        self.buffer.position()
    }

    /// Rewinds (or advances) the write cursor.
    ///
    /// Later writes overwrite from `position`; bytes past the cursor are no
    /// longer part of the output.
    pub fn set_position(&mut self, position: usize) {
        self.buffer.set_position(position);
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buffer.position()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current buffer capacity.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Returns the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.snapshot()
    }

    /// Consumes the writer, returning the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.into_bytes()
    }
}

impl WriteStream for StandardWriter {
    #[inline]
    fn write_uint32(&mut self, value: u32) {
        varint::write_uint32(&mut self.buffer, value);
    }

    fn write_bool(&mut self, value: bool) {
        self.buffer.append_byte(value as u8);
    }

    fn write_byte(&mut self, value: u8) {
        self.buffer.append_byte(value);
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Reader for the standard format.
///
/// Wraps a byte slice with a cursor; every read is bounds checked.
#[derive(Debug, Clone)]
pub struct StandardReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> StandardReader<'a> {
    /// Creates a reader at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Creates a reader starting at `position`.
    pub fn with_position(data: &'a [u8], position: usize) -> Self {
        Self { data, pos: position }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the read cursor.
    pub fn set_position(&mut self, position: usize) {
        self.pos = position;
    }

    /// Returns the remaining bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    #[inline]
    fn read_raw_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(DecodeError::UnexpectedEof { context })?;
        self.pos += 1;
        Ok(byte)
    }
}

impl ReadStream for StandardReader<'_> {
    #[inline]
    fn read_uint32(&mut self) -> Result<u32, DecodeError> {
        varint::read_uint32(self.data, &mut self.pos, "uint32")
    }

    fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_raw_byte("bool")? != 0)
    }

    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        self.read_raw_byte("byte")
    }
}
