//! Ledger values exposed to scripts as opaque interop items.

use neo_core::UInt160;
use neo_ledger::{
    Account, Asset, Attribute, Block, ConsensusPayload, Contract, Header, Input, Output,
    ScriptContainer, Transaction, Validator,
};

/// Handle to a contract's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageContext {
    pub script_hash: UInt160,
    pub read_only: bool,
}

impl StorageContext {
    pub fn new(script_hash: UInt160, read_only: bool) -> Self {
        Self {
            script_hash,
            read_only,
        }
    }
}

/// A ledger entity held by a stack item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteropValue {
    Header(Header),
    Block(Block),
    Transaction(Transaction),
    Attribute(Attribute),
    Input(Input),
    Output(Output),
    Account(Account),
    Asset(Asset),
    Contract(Contract),
    Validator(Validator),
    Consensus(ConsensusPayload),
}

impl InteropValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            InteropValue::Header(_) => "Header",
            InteropValue::Block(_) => "Block",
            InteropValue::Transaction(_) => "Transaction",
            InteropValue::Attribute(_) => "Attribute",
            InteropValue::Input(_) => "Input",
            InteropValue::Output(_) => "Output",
            InteropValue::Account(_) => "Account",
            InteropValue::Asset(_) => "Asset",
            InteropValue::Contract(_) => "Contract",
            InteropValue::Validator(_) => "Validator",
            InteropValue::Consensus(_) => "Consensus",
        }
    }
}

impl From<&ScriptContainer> for InteropValue {
    fn from(container: &ScriptContainer) -> Self {
        match container {
            ScriptContainer::Transaction(tx) => InteropValue::Transaction(tx.clone()),
            ScriptContainer::Block(block) => InteropValue::Block(block.clone()),
            ScriptContainer::Consensus(payload) => InteropValue::Consensus(payload.clone()),
        }
    }
}
