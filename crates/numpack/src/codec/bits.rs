//! Bit-level helpers for the floating-point and 64-bit encodings.

/// Reverses the bit order of a 32-bit word.
///
/// Swaps adjacent bits, then pairs, nibbles, bytes and finally half-words.
/// Every step is its own inverse, so the whole permutation is an
/// involution: `reverse_bits(reverse_bits(x)) == x` for every `x`.
///
/// Floats are left-justified (sign and exponent in the high bits), so
/// common values such as small integers or powers of two have long runs of
/// trailing zero bits. Reversed, those become leading zeros and the value
/// encodes as a short varint.
#[inline]
pub const fn reverse_bits(x: u32) -> u32 {
    let x = ((x & 0x5555_5555) << 1) | ((x >> 1) & 0x5555_5555);
    let x = ((x & 0x3333_3333) << 2) | ((x >> 2) & 0x3333_3333);
    let x = ((x & 0x0F0F_0F0F) << 4) | ((x >> 4) & 0x0F0F_0F0F);
    let x = ((x & 0x00FF_00FF) << 8) | ((x >> 8) & 0x00FF_00FF);
    x.rotate_left(16)
}

/// Splits a 64-bit word into its `(low, high)` 32-bit halves.
#[inline]
pub const fn split_halves(x: u64) -> (u32, u32) {
    (x as u32, (x >> 32) as u32)
}

/// Joins `(low, high)` 32-bit halves back into a 64-bit word.
#[inline]
pub const fn join_halves(low: u32, high: u32) -> u64 {
    ((high as u64) << 32) | low as u64
}
