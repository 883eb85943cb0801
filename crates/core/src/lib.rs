//! # Neo Core
//!
//! Fundamental value types shared by every crate of the legacy script engine.
//!
//! - [`UInt160`]: script hashes and account addresses
//! - [`UInt256`]: block, transaction and asset identifiers
//!
//! Both store their bytes little-endian and display as big-endian hex with a `0x`
//! prefix.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Core error types
pub mod error;
mod fixed_hash;
/// 160-bit hash type
pub mod uint160;
/// 256-bit hash type
pub mod uint256;

pub use error::{CoreError, CoreResult};
pub use uint160::UInt160;
pub use uint256::UInt256;
