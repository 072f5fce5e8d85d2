//! Typed values carried by numpack streams.
//!
//! Streams store no type tags. A [`ValueKind`] sequence held by the caller
//! is the schema that drives a reader through what the writer produced.

/// A single encodable value.
///
/// Equality compares raw bit patterns for the floating variants: `-0.0`
/// differs from `0.0`, and a NaN equals itself only if its payload matches.
/// This is the fidelity contract of both wire formats.
#[derive(Debug, Clone, Copy)]
pub enum Value {
    UInt32(u32),
    Int32(i32),
    Float32(f32),
    Float64(f64),
    Int64(i64),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::UInt32(_) => ValueKind::UInt32,
            Value::Int32(_) => ValueKind::Int32,
            Value::Float32(_) => ValueKind::Float32,
            Value::Float64(_) => ValueKind::Float64,
            Value::Int64(_) => ValueKind::Int64,
        }
    }

    /// Returns the raw bit pattern, widened to 64 bits.
    pub fn to_bits(&self) -> u64 {
        match *self {
            Value::UInt32(v) => v as u64,
            Value::Int32(v) => v as u32 as u64,
            Value::Float32(v) => v.to_bits() as u64,
            Value::Float64(v) => v.to_bits(),
            Value::Int64(v) => v as u64,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.to_bits() == other.to_bits()
    }
}

impl Eq for Value {}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt32(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

/// Value kinds, one per [`Value`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    UInt32,
    Int32,
    Float32,
    Float64,
    Int64,
}

impl ValueKind {
    /// Returns a short name, used as decode error context by
    /// [`ReadStream::read_value`](crate::codec::ReadStream::read_value).
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::UInt32 => "uint32",
            ValueKind::Int32 => "int32",
            ValueKind::Float32 => "float32",
            ValueKind::Float64 => "float64",
            ValueKind::Int64 => "int64",
        }
    }
}
