//! Neo Configuration Module
//!
//! Configuration types for the legacy script engine: resource limits, the gas fee
//! schedule and the protocol settings the engine reads from the ledger.
//!
//! Every structure implements [`Default`] with the values the Neo 2.x network uses and
//! can be overridden piecemeal from TOML through [`VmConfig::from_toml_str`].

/// Configuration errors
pub mod error;
/// Gas fee schedule
pub mod fees;
/// Engine resource limits
pub mod limits;
/// Network protocol settings
pub mod protocol;
/// Top level engine configuration
pub mod vm_config;

pub use error::{ConfigError, ConfigResult};
pub use fees::{FeeSchedule, Fixed8, ONE_GAS};
pub use limits::VmLimits;
pub use protocol::ProtocolSettings;
pub use vm_config::VmConfig;

/// Blockchain timing constants
pub const SECONDS_PER_BLOCK: u64 = 15;

/// Number of blocks counted as one year for asset expiration.
pub const BLOCK_HEIGHT_YEAR: u32 = 2_000_000;

/// Size of a hash (UInt256) in bytes
pub const HASH_SIZE: usize = 32;
/// Size of an address (UInt160) in bytes
pub const ADDRESS_SIZE: usize = 20;
/// Size of a compressed public key in bytes
pub const ECPOINT_SIZE: usize = 33;

/// Largest payload a block may carry, in bytes.
pub const MAX_PAYLOAD_SIZE: u64 = 0x0200_0000;
