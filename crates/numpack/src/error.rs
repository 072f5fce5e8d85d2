//! Error types for numpack stream decoding.

use thiserror::Error;

/// Error during stream decoding.
///
/// Both wire formats are closed two-party formats: a reader only ever
/// consumes what the matching writer produced. These errors exist so that
/// a truncated or misaligned stream fails cleanly instead of reading out
/// of bounds; they are not a validation layer for untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("{context} exceeds maximum length (5 bytes)")]
    VarintTooLong { context: &'static str },

    #[error("{context} overflow (value exceeds u32)")]
    VarintOverflow { context: &'static str },
}

impl DecodeError {
    /// Returns the context the error was raised in.
    pub fn context(&self) -> &'static str {
        match self {
            DecodeError::UnexpectedEof { context }
            | DecodeError::VarintTooLong { context }
            | DecodeError::VarintOverflow { context } => context,
        }
    }

    /// Returns the same error reported under `context`.
    pub fn with_context(self, context: &'static str) -> Self {
        match self {
            DecodeError::UnexpectedEof { .. } => DecodeError::UnexpectedEof { context },
            DecodeError::VarintTooLong { .. } => DecodeError::VarintTooLong { context },
            DecodeError::VarintOverflow { .. } => DecodeError::VarintOverflow { context },
        }
    }
}
