//! Owned, doubling byte buffer shared by both stream writers.

use crate::limits::{DEFAULT_INITIAL_CAPACITY, MIN_EXPANSION};

/// Byte buffer with an explicit write cursor.
///
/// The backing array is always fully initialized (`bytes.len()` is the
/// capacity); `position` marks the end of the written prefix. Growth doubles
/// the capacity, never shrinks it, and copies the written prefix
/// `[0, position)` into the new array before switching to it.
#[derive(Debug, Clone)]
pub struct GrowableBuffer {
    bytes: Vec<u8>,
    position: usize,
}

impl Default for GrowableBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl GrowableBuffer {
    /// Creates a buffer with the default initial capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// Creates a buffer with the given initial capacity.
    ///
    /// A capacity of zero is allowed; the first write grows it to
    /// [`MIN_EXPANSION`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
            position: 0,
        }
    }

    /// Returns the current capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the write cursor.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the write cursor.
    ///
    /// Bytes at and after `position` are treated as unwritten and may be
    /// discarded by the next growth.
    ///
    /// # Panics
    ///
    /// Panics if `position` exceeds the capacity.
    pub fn set_position(&mut self, position: usize) {
        assert!(
            position <= self.capacity(),
            "position {} beyond capacity {}",
            position,
            self.capacity()
        );
        self.position = position;
    }

    /// Returns the number of bytes that can be written without growing.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.position
    }

    /// Returns true if the cursor is at the end of the backing array.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.position >= self.capacity()
    }

    /// Grows until at least `n` more bytes fit after the cursor.
    ///
    /// Writers call this before starting a value with that value's
    /// worst-case length, so no value is ever split across a growth.
    ///
    /// # Panics
    ///
    /// Panics if `position + n` is not representable.
    pub fn ensure(&mut self, n: usize) {
        let needed = self
            .position
            .checked_add(n)
            .unwrap_or_else(|| panic!("buffer size overflow: {} + {}", self.position, n));
        while self.capacity() < needed {
            self.grow();
        }
    }

    /// Appends one byte, growing first if the buffer is full.
    #[inline]
    pub fn append_byte(&mut self, byte: u8) {
        if self.is_full() {
            self.grow();
        }
        self.bytes[self.position] = byte;
        self.position += 1;
    }

    /// Appends raw bytes.
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.ensure(bytes.len());
        self.bytes[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.position += bytes.len();
    }

    /// Overwrites the byte under the cursor without advancing.
    #[inline]
    pub(crate) fn store_current(&mut self, byte: u8) {
        self.bytes[self.position] = byte;
    }

    /// ORs bits into the byte under the cursor without advancing.
    #[inline]
    pub(crate) fn merge_current(&mut self, bits: u8) {
        self.bytes[self.position] |= bits;
    }

    /// Advances the cursor by one byte, growing at that boundary so the new
    /// current byte always exists.
    #[inline]
    pub(crate) fn advance(&mut self) {
        self.position += 1;
        if self.is_full() {
            self.grow();
        }
    }

    /// Returns the written prefix `[0, position)`.
    #[inline]
    pub fn snapshot(&self) -> &[u8] {
        &self.bytes[..self.position]
    }

    /// Returns the first `len` bytes of the backing array.
    pub(crate) fn prefix(&self, len: usize) -> &[u8] {
        &self.bytes[..len]
    }

    /// Consumes the buffer, returning the written prefix.
    pub fn into_bytes(self) -> Vec<u8> {
        let len = self.position;
        self.into_prefix(len)
    }

    pub(crate) fn into_prefix(mut self, len: usize) -> Vec<u8> {
        self.bytes.truncate(len);
        self.bytes
    }

    /// Doubles the capacity, with a floor of [`MIN_EXPANSION`].
    fn grow(&mut self) {
        let doubled = match self.capacity().checked_mul(2) {
            Some(n) if n <= isize::MAX as usize => n,
            _ => panic!("buffer capacity overflow growing from {} bytes", self.capacity()),
        };
        let new_capacity = doubled.max(MIN_EXPANSION);
        debug_assert!(new_capacity > self.position, "growth must make room");

        let mut grown = vec![0u8; new_capacity];
        grown[..self.position].copy_from_slice(&self.bytes[..self.position]);
        self.bytes = grown;
    }
}
