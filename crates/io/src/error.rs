//! IO error types.

use thiserror::Error;

/// Errors raised while decoding binary data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IoError {
    /// Not enough bytes remain
    #[error("Unexpected end of data: needed {needed} bytes at position {position}")]
    EndOfStream {
        /// Read position
        position: usize,
        /// Bytes required
        needed: usize,
    },

    /// A length or var-int exceeded the permitted maximum
    #[error("Value {value} exceeds maximum {max}")]
    ExceedsMaximum {
        /// Decoded value
        value: u64,
        /// Permitted maximum
        max: u64,
    },

    /// Data does not have the expected shape
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for IO operations.
pub type IoResult<T> = Result<T, IoError>;
