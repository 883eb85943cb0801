//! The signed object a script executes on behalf of.

use std::collections::BTreeSet;

use neo_core::UInt160;
use neo_cryptography::verification_script_hash;

use crate::{
    Block, Blockchain, ConsensusPayload, HashOrIndex, LedgerError, LedgerResult, Transaction,
};

/// Discriminant exposed to scripts.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptContainerType {
    Transaction = 0x00,
    Block = 0x01,
    Consensus = 0x02,
}

/// Transaction, block or consensus payload whose witnesses authorize the executing script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptContainer {
    Transaction(Transaction),
    Block(Block),
    Consensus(ConsensusPayload),
}

impl ScriptContainer {
    pub fn container_type(&self) -> ScriptContainerType {
        match self {
            Self::Transaction(_) => ScriptContainerType::Transaction,
            Self::Block(_) => ScriptContainerType::Block,
            Self::Consensus(_) => ScriptContainerType::Consensus,
        }
    }

    /// Bytes signed by the container's witnesses.
    pub fn message(&self) -> LedgerResult<Vec<u8>> {
        match self {
            Self::Transaction(tx) => Ok(tx.message()?),
            Self::Block(block) => Ok(block.header.message()),
            Self::Consensus(payload) => Ok(payload.message()?),
        }
    }

    /// Script hashes whose witnesses must accompany the container.
    pub fn script_hashes_for_verifying(
        &self,
        blockchain: &dyn Blockchain,
    ) -> LedgerResult<BTreeSet<UInt160>> {
        let mut hashes = BTreeSet::new();
        match self {
            Self::Transaction(tx) => {
                hashes.extend(tx.script_attribute_hashes());
                for input in &tx.inputs {
                    hashes.insert(blockchain.get_output(input)?.address);
                }
                for output in &tx.outputs {
                    let asset = blockchain.get_asset(&output.asset)?;
                    if asset.asset_type.is_duty() {
                        hashes.insert(output.address);
                    }
                }
            }
            Self::Block(block) => {
                if block.header.index == 0 {
                    hashes.insert(block.header.next_consensus);
                } else {
                    let prev = blockchain
                        .get_header(&HashOrIndex::Hash(block.header.prev_hash))?;
                    hashes.insert(prev.next_consensus);
                }
            }
            Self::Consensus(payload) => {
                if payload.prev_hash != blockchain.current_block().hash() {
                    return Err(LedgerError::InvalidScriptContainer(format!(
                        "consensus payload {} does not follow the current block",
                        payload.hash()
                    )));
                }
                let validators = blockchain.next_validators();
                let validator = validators
                    .get(payload.validator_index as usize)
                    .ok_or_else(|| {
                        LedgerError::InvalidScriptContainer(format!(
                            "validator index {} out of range",
                            payload.validator_index
                        ))
                    })?;
                hashes.insert(verification_script_hash(validator));
            }
        }
        Ok(hashes)
    }
}
