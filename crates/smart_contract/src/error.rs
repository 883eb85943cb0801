//! Error types for the native contract crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ContractResult<T> = std::result::Result<T, ContractError>;
