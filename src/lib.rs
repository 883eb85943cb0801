//! # Neo Legacy VM
//!
//! A deterministic execution engine for the Neo 2.x script instruction set, with the
//! native NEP-5 tokens and the Policy contract wired in.
//!
//! ## Quick Start
//!
//! ```rust
//! use neo_legacy_vm::prelude::*;
//!
//! let mut invoker = LocalInvoker::new(VmConfig::default()).unwrap();
//! let result = invoker.invoke(&[0x52, 0x53, 0x93], &[]);
//! assert!(result.state.is_halt());
//! assert_eq!(result.stack, vec![ContractParameter::Integer(5.into())]);
//! ```
//!
//! ## Architecture
//!
//! - [`neo_core`] - `UInt160` and `UInt256` value types
//! - [`neo_config`] - limits, fee schedule and protocol settings
//! - [`neo_io`] - binary reader and writer
//! - [`neo_cryptography`] - hashes and secp256r1 signatures
//! - [`neo_ledger`] - ledger entities and the state-access interface
//! - [`neo_vm`] - stack items, operation tables and the engine
//! - [`neo_smart_contract`] - native contracts

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use neo_config as config;
pub use neo_core as core;
pub use neo_cryptography as crypto;
pub use neo_io as io;
pub use neo_ledger as ledger;
pub use neo_smart_contract as smart_contract;
pub use neo_vm as vm;

use log::debug;
use neo_config::VmConfig;
use neo_core::UInt160;
use neo_ledger::{Attribute, AttributeUsage, MemoryBlockchain, ScriptContainer, Transaction};
use neo_vm::{
    ExecuteScriptsResult, ExecutionEngine, ExecutionInit, Script, TriggerType, VmListener,
    VmResult,
};

/// Common imports for running scripts
pub mod prelude {
    pub use crate::core::{UInt160, UInt256};
    pub use crate::config::{FeeSchedule, VmConfig, VmLimits, ONE_GAS};
    pub use crate::ledger::{Blockchain, MemoryBlockchain, ScriptContainer, Transaction};
    pub use crate::smart_contract::{GasToken, NeoToken, PolicyContract};
    pub use crate::vm::{
        ContractParameter, ExecuteScriptsResult, ExecutionEngine, ExecutionInit, OpCode,
        RecordingListener, Script, ScriptBuilder, StackItem, TriggerType, VMState,
    };
    pub use crate::{default_engine, engine_with_config, LocalInvoker};
}

/// An engine with default limits and fees and the native contracts registered.
pub fn default_engine() -> ExecutionEngine {
    engine_with_config(VmConfig::default())
}

/// An engine using `config` with the native contracts registered.
pub fn engine_with_config(config: VmConfig) -> ExecutionEngine {
    ExecutionEngine::with_natives(config, neo_smart_contract::natives())
}

/// Runs invocation scripts against an in-memory ledger.
#[derive(Debug)]
pub struct LocalInvoker {
    engine: ExecutionEngine,
    blockchain: MemoryBlockchain,
}

impl LocalInvoker {
    /// Creates an invoker over a fresh ledger and writes the native genesis state.
    pub fn new(config: VmConfig) -> VmResult<Self> {
        Self::with_blockchain(config, MemoryBlockchain::default())
    }

    /// Creates an invoker over `blockchain` and writes any missing native genesis state.
    pub fn with_blockchain(config: VmConfig, mut blockchain: MemoryBlockchain) -> VmResult<Self> {
        let engine = engine_with_config(config);
        let init = ExecutionInit::new(
            ScriptContainer::Transaction(Transaction::invocation(Vec::new())),
            TriggerType::Application,
        );
        engine.initialize_natives(&mut blockchain, &init, None)?;
        debug!("local invoker ready with {} native contracts", engine.natives().len());
        Ok(Self { engine, blockchain })
    }

    /// Runs `script` as an invocation transaction witnessed by `witnesses`.
    pub fn invoke(&mut self, script: &[u8], witnesses: &[UInt160]) -> ExecuteScriptsResult {
        self.invoke_with(script, witnesses, 0, None)
    }

    /// Runs `script` with `gas` on top of the free allowance, reporting to `listener`.
    ///
    /// The script runs against a copy of the ledger that replaces it only when the run
    /// halts, so a faulted run leaves no writes behind.
    pub fn invoke_with(
        &mut self,
        script: &[u8],
        witnesses: &[UInt160],
        gas: i64,
        listener: Option<&mut dyn VmListener>,
    ) -> ExecuteScriptsResult {
        let mut tx = Transaction::invocation(script.to_vec());
        tx.attributes = witnesses
            .iter()
            .map(|hash| Attribute {
                usage: AttributeUsage::SCRIPT,
                data: hash.to_array().to_vec(),
            })
            .collect();
        let init = ExecutionInit::new(ScriptContainer::Transaction(tx), TriggerType::Application);
        let mut snapshot = self.blockchain.clone();
        let result = self.engine.invoke_scripts(
            &mut snapshot,
            &[Script::new(script.to_vec())],
            gas,
            &init,
            listener,
        );
        if result.state.is_halt() {
            self.blockchain = snapshot;
        } else {
            debug!("discarding ledger writes of a {:?} run", result.state);
        }
        result
    }

    /// The engine scripts run on.
    pub fn engine(&self) -> &ExecutionEngine {
        &self.engine
    }

    /// The ledger scripts read and write.
    pub fn blockchain(&self) -> &MemoryBlockchain {
        &self.blockchain
    }

    /// Mutable access to the ledger, e.g. to deploy contracts or persist blocks.
    pub fn blockchain_mut(&mut self) -> &mut MemoryBlockchain {
        &mut self.blockchain
    }
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
