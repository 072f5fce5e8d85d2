//! Stream encoding/decoding for numpack.
//!
//! Two independent wire formats share the typed API in [`stream`]:
//! [`standard`] (byte-aligned varints) and [`sparse`] (bit-packed, with a
//! one-bit zero). Bytes written by one cannot be read by the other.

pub mod bits;
pub mod sparse;
pub mod standard;
pub mod stream;
pub mod varint;

pub use bits::reverse_bits;
pub use sparse::{BitCursor, SparseReader, SparseWriter};
pub use standard::{StandardReader, StandardWriter};
pub use stream::{ReadStream, WriteStream, WriterOptions};
pub use varint::{decode_sign, encode_sign};
