//! Error types for the core value types.

use thiserror::Error;

/// Errors raised while constructing or parsing core value types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Input had the wrong number of bytes for the target type.
    #[error("Invalid length: expected {expected} bytes, found {found}")]
    InvalidLength {
        /// Required length
        expected: usize,
        /// Actual length
        found: usize,
    },

    /// Input was not valid hexadecimal.
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),
}

/// Result type for core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
