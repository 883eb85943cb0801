//! Ledger state entities readable and writable by scripts.

mod account;
mod asset;
mod contract;
mod storage;
mod validator;

pub use account::Account;
pub use asset::{Asset, AssetType};
pub use contract::{Contract, ContractParameterType, ContractPropertyState};
pub use storage::{StorageFlags, StorageItem};
pub use validator::Validator;
