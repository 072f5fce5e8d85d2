//! Typed stream traits shared by both wire formats.
//!
//! Each format supplies a single unsigned 32-bit primitive. Every other
//! type is derived from it here, so the standard and sparse streams agree
//! on how a float or a long is decomposed while their bytes stay
//! incompatible.

use crate::codec::bits::{join_halves, reverse_bits, split_halves};
use crate::codec::varint::{decode_sign, encode_sign};
use crate::error::DecodeError;
use crate::limits::DEFAULT_INITIAL_CAPACITY;
use crate::model::{Value, ValueKind};

/// Options for creating a stream writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Capacity of the writer's buffer before its first growth.
    ///
    /// Any value works, including zero. A small capacity only costs extra
    /// copies as the buffer doubles.
    pub initial_capacity: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl WriterOptions {
    /// Creates default writer options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options with the given initial buffer capacity.
    pub fn with_initial_capacity(initial_capacity: usize) -> Self {
        Self { initial_capacity }
    }
}

/// Writer side of a numpack stream.
pub trait WriteStream {
    /// Writes an unsigned 32-bit value in this stream's native encoding.
    fn write_uint32(&mut self, value: u32);

    /// Writes `true` as 1 and `false` as 0.
    fn write_bool(&mut self, value: bool) {
        self.write_uint32(value as u32);
    }

    /// Writes a byte as an unsigned value.
    fn write_byte(&mut self, value: u8) {
        self.write_uint32(value as u32);
    }

    /// Writes a UTF-16 code unit as an unsigned value.
    fn write_char(&mut self, value: u16) {
        self.write_uint32(value as u32);
    }

    /// Writes a 16-bit value through the signed mapping.
    fn write_short(&mut self, value: i16) {
        self.write_signed_int(value as i32);
    }

    /// Writes a signed value through the zigzag sign mapping.
    fn write_signed_int(&mut self, value: i32) {
        self.write_uint32(encode_sign(value));
    }

    /// Writes the bit-reversed pattern of `value`.
    fn write_float(&mut self, value: f32) {
        let bits = value.to_bits();
        let reversed = reverse_bits(bits);
        debug_assert_eq!(reverse_bits(reversed), bits, "can re-read same bits");
        self.write_uint32(reversed);
    }

    /// Writes the low then the high half of `value`, each bit-reversed.
    fn write_double(&mut self, value: f64) {
        let (low, high) = split_halves(value.to_bits());
        let (rl, rh) = (reverse_bits(low), reverse_bits(high));
        debug_assert_eq!(reverse_bits(rl), low, "can re-read same bits");
        debug_assert_eq!(reverse_bits(rh), high, "can re-read same bits");
        self.write_uint32(rl);
        self.write_uint32(rh);
    }

    /// Writes the low then the high half of `value` as signed 32-bit values.
    fn write_long(&mut self, value: i64) {
        let (low, high) = split_halves(value as u64);
        self.write_signed_int(low as i32);
        self.write_signed_int(high as i32);
    }

    /// Writes any [`Value`] with the encoding for its kind.
    fn write_value(&mut self, value: &Value) {
        match *value {
            Value::UInt32(v) => self.write_uint32(v),
            Value::Int32(v) => self.write_signed_int(v),
            Value::Float32(v) => self.write_float(v),
            Value::Float64(v) => self.write_double(v),
            Value::Int64(v) => self.write_long(v),
        }
    }
}

/// Reader side of a numpack stream.
///
/// Must be driven by the same sequence of typed calls the writer used;
/// nothing in the stream records what was written.
pub trait ReadStream {
    /// Reads an unsigned 32-bit value in this stream's native encoding.
    fn read_uint32(&mut self) -> Result<u32, DecodeError>;

    fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_uint32()? != 0)
    }

    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_uint32()? as u8)
    }

    fn read_char(&mut self) -> Result<u16, DecodeError> {
        Ok(self.read_uint32()? as u16)
    }

    fn read_short(&mut self) -> Result<i16, DecodeError> {
        Ok(self.read_signed_int()? as i16)
    }

    fn read_signed_int(&mut self) -> Result<i32, DecodeError> {
        Ok(decode_sign(self.read_uint32()?))
    }

    fn read_float(&mut self) -> Result<f32, DecodeError> {
        let reversed = self.read_uint32()?;
        Ok(f32::from_bits(reverse_bits(reversed)))
    }

    fn read_double(&mut self) -> Result<f64, DecodeError> {
        let rl = self.read_uint32()?;
        let rh = self.read_uint32()?;
        Ok(f64::from_bits(join_halves(reverse_bits(rl), reverse_bits(rh))))
    }

    fn read_long(&mut self) -> Result<i64, DecodeError> {
        let low = self.read_signed_int()?;
        let high = self.read_signed_int()?;
        Ok(join_halves(low as u32, high as u32) as i64)
    }

    /// Reads one value of the given kind.
    ///
    /// Errors are reported under the kind's name, e.g. `int64`.
    fn read_value(&mut self, kind: ValueKind) -> Result<Value, DecodeError> {
        let value = match kind {
            ValueKind::UInt32 => self.read_uint32().map(Value::UInt32),
            ValueKind::Int32 => self.read_signed_int().map(Value::Int32),
            ValueKind::Float32 => self.read_float().map(Value::Float32),
            ValueKind::Float64 => self.read_double().map(Value::Float64),
            ValueKind::Int64 => self.read_long().map(Value::Int64),
        };
        value.map_err(|e| e.with_context(kind.name()))
    }

    /// Reads one value per entry of `schema`, in order.
    fn read_values(&mut self, schema: &[ValueKind]) -> Result<Vec<Value>, DecodeError> {
        let mut values = Vec::with_capacity(schema.len());
        for kind in schema {
            values.push(self.read_value(*kind)?);
        }
        Ok(values)
    }
}
