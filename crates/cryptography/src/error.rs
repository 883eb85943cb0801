//! Error types for cryptographic operations.

use thiserror::Error;

/// Errors raised by key parsing and signature verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Public key bytes are malformed
    #[error("Invalid public key: {0}")]
    InvalidKey(String),

    /// Signature bytes are malformed
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
