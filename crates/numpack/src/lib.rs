//! numpack: compact binary streams for numeric metadata.
//!
//! This crate encodes 32-bit and 64-bit integers and IEEE floats into byte
//! streams in two independent wire formats.
//!
//! # Overview
//!
//! - **Standard** ([`StandardWriter`] / [`StandardReader`]): every value is
//!   one or more unsigned varints. Signed values go through a zigzag sign
//!   mapping; floats are bit-reversed first so that integral and
//!   power-of-two values encode in one or two bytes.
//! - **Sparse** ([`SparseWriter`] / [`SparseReader`]): a bit-level format
//!   where a zero costs a single bit and small values one byte, for data
//!   that is mostly zeros.
//!
//! Both round-trip raw bit patterns exactly: `-0.0` and NaN payloads come
//! back unchanged.
//!
//! # Quick Start
//!
//! ```rust
//! use numpack::{ReadStream, SparseReader, SparseWriter, WriteStream};
//!
//! let mut writer = SparseWriter::new();
//! writer.write_zero();
//! writer.write_signed_int(-3);
//! writer.write_double(0.5);
//! let bytes = writer.into_bytes();
//!
//! let mut reader = SparseReader::new(&bytes);
//! assert_eq!(reader.read_uint32().unwrap(), 0);
//! assert_eq!(reader.read_signed_int().unwrap(), -3);
//! assert_eq!(reader.read_double().unwrap(), 0.5);
//! ```
//!
//! # Wire Format
//!
//! Streams carry no type tags or framing. A reader must issue exactly the
//! sequence of typed calls the writer made; a [`ValueKind`] slice can serve
//! as that schema via [`ReadStream::read_values`].
//!
//! # Modules
//!
//! - [`buffer`]: Growable output buffer
//! - [`codec`]: Both wire formats and the shared typed stream traits
//! - [`model`]: Typed values and kinds
//! - [`error`]: Error types
//! - [`limits`]: Wire-format constants

pub mod buffer;
pub mod codec;
pub mod error;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use buffer::GrowableBuffer;
pub use codec::{
    BitCursor, ReadStream, SparseReader, SparseWriter, StandardReader, StandardWriter,
    WriteStream, WriterOptions,
};
pub use error::DecodeError;
pub use model::{Value, ValueKind};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
