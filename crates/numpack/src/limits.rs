//! Wire-format constants and buffer sizing.

/// Maximum encoded length of an unsigned 32-bit varint (5 x 7 bits).
pub const MAX_UINT32_LEN: usize = 5;

/// Maximum encoded length of a nonzero value in the sparse format
/// (6 payload bits, then 4 x 7).
pub const MAX_SPARSE_LEN: usize = 5;

/// Longest encoding of any single 32-bit value in either format.
pub const MAX_VALUE_LEN: usize = if MAX_UINT32_LEN > MAX_SPARSE_LEN {
    MAX_UINT32_LEN
} else {
    MAX_SPARSE_LEN
};

/// Smallest capacity a buffer grows to.
///
/// Twice the worst-case length of one value, so that a value started after
/// an `ensure` never needs a second grow before it is complete.
pub const MIN_EXPANSION: usize = 2 * MAX_VALUE_LEN;

/// Capacity used by writers created without explicit options.
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Payload bits carried by the first byte of a sparse value.
pub const SPARSE_FIRST_PAYLOAD_BITS: u32 = 6;

/// Payload bits carried by every varint byte after the first sparse byte.
pub const PAYLOAD_BITS: u32 = 7;
