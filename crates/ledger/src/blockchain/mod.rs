//! State-access interface consumed by the execution engine.
//!
//! All access is synchronous: a script step either completes its reads and writes or
//! fails, with no suspension points in between.

mod memory;

pub use memory::MemoryBlockchain;

use std::fmt;

use neo_config::ProtocolSettings;
use neo_core::{UInt160, UInt256};
use neo_cryptography::ECPoint;

use crate::{
    Account, Asset, Block, Contract, Header, Input, LedgerError, LedgerResult, Output,
    StorageItem, Transaction, Validator,
};

/// Block lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashOrIndex {
    Hash(UInt256),
    Index(u32),
}

impl fmt::Display for HashOrIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash(hash) => write!(f, "{hash}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Ledger reads and writes available to scripts.
///
/// `try_*` methods return `None` for missing entities; the provided `get_*` methods turn
/// that into [`LedgerError::NotFound`].
pub trait Blockchain {
    fn settings(&self) -> &ProtocolSettings;

    /// Header of the latest persisted block.
    fn current_block(&self) -> &Header;

    fn try_get_header(&self, key: &HashOrIndex) -> Option<Header>;
    fn try_get_block(&self, key: &HashOrIndex) -> Option<Block>;
    fn try_get_transaction(&self, hash: &UInt256) -> Option<Transaction>;
    /// Height of the block containing the transaction.
    fn try_get_transaction_height(&self, hash: &UInt256) -> Option<u32>;
    /// Output referenced by `input`.
    fn try_get_output(&self, input: &Input) -> Option<Output>;
    fn is_spent(&self, input: &Input) -> bool;

    /// All registered validators.
    fn validators(&self) -> Vec<Validator>;
    /// Public keys of the validators of the next block, in consensus order.
    fn next_validators(&self) -> Vec<ECPoint>;
    fn try_get_validator(&self, public_key: &ECPoint) -> Option<Validator>;
    fn add_validator(&mut self, validator: Validator) -> LedgerResult<()>;

    fn try_get_account(&self, hash: &UInt160) -> Option<Account>;
    /// Inserts or replaces the account.
    fn put_account(&mut self, account: Account);
    fn delete_account(&mut self, hash: &UInt160);

    fn try_get_asset(&self, hash: &UInt256) -> Option<Asset>;
    fn add_asset(&mut self, asset: Asset) -> LedgerResult<()>;
    fn update_asset(&mut self, asset: Asset) -> LedgerResult<()>;

    fn try_get_contract(&self, hash: &UInt160) -> Option<Contract>;
    fn add_contract(&mut self, contract: Contract) -> LedgerResult<()>;
    fn delete_contract(&mut self, hash: &UInt160);

    fn try_get_storage(&self, hash: &UInt160, key: &[u8]) -> Option<StorageItem>;
    fn add_storage(&mut self, item: StorageItem) -> LedgerResult<()>;
    fn update_storage(&mut self, item: StorageItem) -> LedgerResult<()>;
    fn delete_storage(&mut self, hash: &UInt160, key: &[u8]);
    /// Items of `hash` whose key starts with `prefix`, ordered by key.
    fn find_storage(&self, hash: &UInt160, prefix: &[u8]) -> Vec<StorageItem>;

    fn get_header(&self, key: &HashOrIndex) -> LedgerResult<Header> {
        self.try_get_header(key)
            .ok_or_else(|| LedgerError::not_found("Header", key))
    }

    fn get_block(&self, key: &HashOrIndex) -> LedgerResult<Block> {
        self.try_get_block(key)
            .ok_or_else(|| LedgerError::not_found("Block", key))
    }

    fn get_transaction(&self, hash: &UInt256) -> LedgerResult<Transaction> {
        self.try_get_transaction(hash)
            .ok_or_else(|| LedgerError::not_found("Transaction", hash))
    }

    fn get_output(&self, input: &Input) -> LedgerResult<Output> {
        self.try_get_output(input).ok_or_else(|| {
            LedgerError::not_found("Output", format!("{}:{}", input.prev_hash, input.prev_index))
        })
    }

    fn get_account(&self, hash: &UInt160) -> LedgerResult<Account> {
        self.try_get_account(hash)
            .ok_or_else(|| LedgerError::not_found("Account", hash))
    }

    fn get_asset(&self, hash: &UInt256) -> LedgerResult<Asset> {
        self.try_get_asset(hash)
            .ok_or_else(|| LedgerError::not_found("Asset", hash))
    }

    fn get_contract(&self, hash: &UInt160) -> LedgerResult<Contract> {
        self.try_get_contract(hash)
            .ok_or_else(|| LedgerError::not_found("Contract", hash))
    }

    fn get_storage(&self, hash: &UInt160, key: &[u8]) -> LedgerResult<StorageItem> {
        self.try_get_storage(hash, key).ok_or_else(|| {
            LedgerError::not_found("StorageItem", format!("{}:{}", hash, hex::encode(key)))
        })
    }
}
