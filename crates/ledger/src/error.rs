//! Ledger error types.

use neo_io::IoError;
use thiserror::Error;

/// Errors raised by ledger reads and writes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The requested entity does not exist
    #[error("{kind} not found: {key}")]
    NotFound {
        /// Entity kind
        kind: &'static str,
        /// Lookup key
        key: String,
    },

    /// An entity with the same key already exists
    #[error("{kind} already exists: {key}")]
    AlreadyExists {
        /// Entity kind
        kind: &'static str,
        /// Lookup key
        key: String,
    },

    /// The script container cannot produce verification hashes
    #[error("Invalid script container: {0}")]
    InvalidScriptContainer(String),

    /// Encoding failure
    #[error("IO error: {0}")]
    Io(#[from] IoError),
}

impl LedgerError {
    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn already_exists(kind: &'static str, key: impl ToString) -> Self {
        Self::AlreadyExists {
            kind,
            key: key.to_string(),
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
