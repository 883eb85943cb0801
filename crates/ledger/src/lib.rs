//! Neo Ledger Module
//!
//! Ledger entities as seen by the legacy script engine and the synchronous
//! state-access interface the engine reads and writes through.
//!
//! ## Components
//!
//! - **Block**: headers and blocks
//! - **Transaction**: transactions with their attributes, inputs and outputs
//! - **State**: accounts, assets, contracts, validators and storage items
//! - **ScriptContainer**: the signed object a script executes on behalf of
//! - **Blockchain**: the state-access trait, with an in-memory implementation

pub mod block;
pub mod blockchain;
pub mod consensus;
pub mod error;
pub mod script_container;
pub mod state;
pub mod transaction;

pub use block::{Block, Header};
pub use blockchain::{Blockchain, HashOrIndex, MemoryBlockchain};
pub use consensus::ConsensusPayload;
pub use error::{LedgerError, LedgerResult};
pub use script_container::ScriptContainer;
pub use state::{
    Account, Asset, AssetType, Contract, ContractParameterType, ContractPropertyState,
    StorageFlags, StorageItem, Validator,
};
pub use transaction::{Attribute, AttributeUsage, Input, Output, Transaction, TransactionType};
