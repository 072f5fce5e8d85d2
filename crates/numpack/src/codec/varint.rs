//! Unsigned 32-bit varint and zigzag sign mapping.
//!
//! A value is written low bits first, 7 payload bits per byte; the top bit
//! of each byte is set when another byte follows. Any `u32` takes 1 to 5
//! bytes.

use crate::buffer::GrowableBuffer;
use crate::error::DecodeError;
use crate::limits::{MAX_UINT32_LEN, PAYLOAD_BITS};

/// Encodes `value` into a stack buffer, returning it with the used length.
#[inline]
pub fn encode_uint32(mut value: u32) -> ([u8; MAX_UINT32_LEN], usize) {
    let mut buf = [0u8; MAX_UINT32_LEN];
    let mut len = 0;
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= PAYLOAD_BITS;
        if value != 0 {
            byte |= 0x80;
        }
        buf[len] = byte;
        len += 1;
        if value == 0 {
            break;
        }
    }
    (buf, len)
}

/// Appends `value` as a varint.
///
/// Reserves the worst-case length up front so the value is never split
/// across a buffer growth.
#[inline]
pub fn write_uint32(buffer: &mut GrowableBuffer, value: u32) {
    buffer.ensure(MAX_UINT32_LEN);
    let (buf, len) = encode_uint32(value);
    buffer.append_bytes(&buf[..len]);
}

/// Reads a varint starting at `*pos`, advancing `pos` past it.
#[inline]
pub fn read_uint32(data: &[u8], pos: &mut usize, context: &'static str) -> Result<u32, DecodeError> {
    let mut result: u32 = 0;

    for i in 0..MAX_UINT32_LEN {
        let byte = *data.get(*pos).ok_or(DecodeError::UnexpectedEof { context })?;
        *pos += 1;
        let value = (byte & 0x7F) as u32;

        // The fifth byte only has room for the top 4 bits.
        if i == MAX_UINT32_LEN - 1 && value > 0x0F {
            return Err(DecodeError::VarintOverflow { context });
        }

        result |= value << (PAYLOAD_BITS * i as u32);

        if byte & 0x80 == 0 {
            return Ok(result);
        }
    }

    Err(DecodeError::VarintTooLong { context })
}

/// Returns the number of bytes [`write_uint32`] uses for `value`.
pub fn encoded_len(value: u32) -> usize {
    let bits = u32::BITS - value.leading_zeros();
    (bits.div_ceil(PAYLOAD_BITS) as usize).max(1)
}

/// Maps a signed value to unsigned so that small magnitudes of either sign
/// stay small: 0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, 2 -> 4, ...
#[inline]
pub fn encode_sign(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`encode_sign`].
#[inline]
pub fn decode_sign(value: u32) -> i32 {
    ((value >> 1) as i32) ^ (-((value & 1) as i32))
}
