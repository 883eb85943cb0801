//! In-memory ledger.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use neo_config::ProtocolSettings;
use neo_core::{UInt160, UInt256};
use neo_cryptography::ECPoint;

use super::{Blockchain, HashOrIndex};
use crate::{
    Account, Asset, Block, Contract, Header, Input, LedgerError, LedgerResult, Output,
    StorageItem, Transaction, Validator,
};

/// Ordered in-memory implementation of [`Blockchain`].
///
/// Iteration order of every collection is deterministic, so two executions against
/// equal states observe identical results.
#[derive(Debug, Clone)]
pub struct MemoryBlockchain {
    settings: ProtocolSettings,
    blocks: Vec<Block>,
    block_index: BTreeMap<UInt256, u32>,
    transactions: BTreeMap<UInt256, (Transaction, u32)>,
    spent: BTreeSet<Input>,
    accounts: BTreeMap<UInt160, Account>,
    assets: BTreeMap<UInt256, Asset>,
    contracts: BTreeMap<UInt160, Contract>,
    validators: BTreeMap<ECPoint, Validator>,
    next_validators: Vec<ECPoint>,
    storage: BTreeMap<(UInt160, Vec<u8>), StorageItem>,
}

impl Default for MemoryBlockchain {
    fn default() -> Self {
        Self::new(ProtocolSettings::default())
    }
}

impl MemoryBlockchain {
    /// Creates a ledger holding only an empty genesis block.
    pub fn new(settings: ProtocolSettings) -> Self {
        let mut chain = Self {
            settings,
            blocks: Vec::new(),
            block_index: BTreeMap::new(),
            transactions: BTreeMap::new(),
            spent: BTreeSet::new(),
            accounts: BTreeMap::new(),
            assets: BTreeMap::new(),
            contracts: BTreeMap::new(),
            validators: BTreeMap::new(),
            next_validators: Vec::new(),
            storage: BTreeMap::new(),
        };
        chain.index_block(Block::default());
        chain
    }

    /// Appends a block on top of the current one, fixing up its index and previous hash.
    pub fn persist_block(&mut self, mut block: Block) -> UInt256 {
        let current = self.current_block();
        block.header.index = current.index + 1;
        block.header.prev_hash = current.hash();
        self.index_block(block)
    }

    fn index_block(&mut self, block: Block) -> UInt256 {
        let hash = block.hash();
        let index = block.header.index;
        for tx in &block.transactions {
            for input in &tx.inputs {
                self.spent.insert(*input);
            }
            self.transactions.insert(tx.hash(), (tx.clone(), index));
        }
        debug!(
            "persisted block {} with {} transactions",
            index,
            block.transactions.len()
        );
        self.block_index.insert(hash, index);
        self.blocks.push(block);
        hash
    }

    /// Sets the consensus-ordered validator keys for the next block.
    pub fn set_next_validators(&mut self, validators: Vec<ECPoint>) {
        self.next_validators = validators;
    }

    /// Number of storage rows held for `hash`.
    pub fn storage_len(&self, hash: &UInt160) -> usize {
        self.storage.keys().filter(|(owner, _)| owner == hash).count()
    }

    fn block_by(&self, key: &HashOrIndex) -> Option<&Block> {
        let index = match key {
            HashOrIndex::Hash(hash) => *self.block_index.get(hash)?,
            HashOrIndex::Index(index) => *index,
        };
        self.blocks.get(index as usize)
    }
}

impl Blockchain for MemoryBlockchain {
    fn settings(&self) -> &ProtocolSettings {
        &self.settings
    }

    fn current_block(&self) -> &Header {
        // The genesis block is indexed at construction.
        match self.blocks.last() {
            Some(block) => &block.header,
            None => unreachable!("memory blockchain always holds a genesis block"),
        }
    }

    fn try_get_header(&self, key: &HashOrIndex) -> Option<Header> {
        self.block_by(key).map(|block| block.header.clone())
    }

    fn try_get_block(&self, key: &HashOrIndex) -> Option<Block> {
        self.block_by(key).cloned()
    }

    fn try_get_transaction(&self, hash: &UInt256) -> Option<Transaction> {
        self.transactions.get(hash).map(|(tx, _)| tx.clone())
    }

    fn try_get_transaction_height(&self, hash: &UInt256) -> Option<u32> {
        self.transactions.get(hash).map(|(_, height)| *height)
    }

    fn try_get_output(&self, input: &Input) -> Option<Output> {
        let (tx, _) = self.transactions.get(&input.prev_hash)?;
        tx.outputs.get(input.prev_index as usize).cloned()
    }

    fn is_spent(&self, input: &Input) -> bool {
        self.spent.contains(input)
    }

    fn validators(&self) -> Vec<Validator> {
        self.validators.values().cloned().collect()
    }

    fn next_validators(&self) -> Vec<ECPoint> {
        self.next_validators.clone()
    }

    fn try_get_validator(&self, public_key: &ECPoint) -> Option<Validator> {
        self.validators.get(public_key).cloned()
    }

    fn add_validator(&mut self, validator: Validator) -> LedgerResult<()> {
        if self.validators.contains_key(&validator.public_key) {
            return Err(LedgerError::already_exists("Validator", &validator.public_key));
        }
        self.validators
            .insert(validator.public_key.clone(), validator);
        Ok(())
    }

    fn try_get_account(&self, hash: &UInt160) -> Option<Account> {
        self.accounts.get(hash).cloned()
    }

    fn put_account(&mut self, account: Account) {
        self.accounts.insert(account.hash, account);
    }

    fn delete_account(&mut self, hash: &UInt160) {
        self.accounts.remove(hash);
    }

    fn try_get_asset(&self, hash: &UInt256) -> Option<Asset> {
        self.assets.get(hash).cloned()
    }

    fn add_asset(&mut self, asset: Asset) -> LedgerResult<()> {
        if self.assets.contains_key(&asset.hash) {
            return Err(LedgerError::already_exists("Asset", asset.hash));
        }
        self.assets.insert(asset.hash, asset);
        Ok(())
    }

    fn update_asset(&mut self, asset: Asset) -> LedgerResult<()> {
        match self.assets.get_mut(&asset.hash) {
            Some(slot) => {
                *slot = asset;
                Ok(())
            }
            None => Err(LedgerError::not_found("Asset", asset.hash)),
        }
    }

    fn try_get_contract(&self, hash: &UInt160) -> Option<Contract> {
        self.contracts.get(hash).cloned()
    }

    fn add_contract(&mut self, contract: Contract) -> LedgerResult<()> {
        if self.contracts.contains_key(&contract.hash) {
            return Err(LedgerError::already_exists("Contract", contract.hash));
        }
        self.contracts.insert(contract.hash, contract);
        Ok(())
    }

    fn delete_contract(&mut self, hash: &UInt160) {
        self.contracts.remove(hash);
    }

    fn try_get_storage(&self, hash: &UInt160, key: &[u8]) -> Option<StorageItem> {
        self.storage.get(&(*hash, key.to_vec())).cloned()
    }

    fn add_storage(&mut self, item: StorageItem) -> LedgerResult<()> {
        let key = (item.hash, item.key.clone());
        if self.storage.contains_key(&key) {
            return Err(LedgerError::already_exists(
                "StorageItem",
                format!("{}:{}", item.hash, hex::encode(&item.key)),
            ));
        }
        self.storage.insert(key, item);
        Ok(())
    }

    fn update_storage(&mut self, item: StorageItem) -> LedgerResult<()> {
        match self.storage.get_mut(&(item.hash, item.key.clone())) {
            Some(slot) => {
                *slot = item;
                Ok(())
            }
            None => Err(LedgerError::not_found(
                "StorageItem",
                format!("{}:{}", item.hash, hex::encode(&item.key)),
            )),
        }
    }

    fn delete_storage(&mut self, hash: &UInt160, key: &[u8]) {
        self.storage.remove(&(*hash, key.to_vec()));
    }

    fn find_storage(&self, hash: &UInt160, prefix: &[u8]) -> Vec<StorageItem> {
        self.storage
            .range((*hash, prefix.to_vec())..)
            .take_while(|((owner, key), _)| owner == hash && key.starts_with(prefix))
            .map(|(_, item)| item.clone())
            .collect()
    }
}
