#![allow(dead_code)]

use neo_config::VmConfig;
use neo_core::UInt160;
use neo_ledger::{
    Attribute, AttributeUsage, Blockchain, Contract, ContractPropertyState, MemoryBlockchain,
    ScriptContainer, Transaction,
};
use neo_vm::{
    ExecuteScriptsResult, ExecutionEngine, ExecutionInit, Script, TriggerType, VmListener,
};

pub fn engine() -> ExecutionEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    ExecutionEngine::new(VmConfig::default())
}

/// An application run for an invocation transaction witnessed by `witnesses`.
pub fn invocation(script: &[u8], witnesses: &[UInt160]) -> ExecutionInit {
    let mut tx = Transaction::invocation(script.to_vec());
    tx.attributes = witnesses
        .iter()
        .map(|hash| Attribute {
            usage: AttributeUsage::SCRIPT,
            data: hash.to_array().to_vec(),
        })
        .collect();
    ExecutionInit::new(ScriptContainer::Transaction(tx), TriggerType::Application)
}

pub fn verification(script: &[u8]) -> ExecutionInit {
    ExecutionInit::new(
        ScriptContainer::Transaction(Transaction::invocation(script.to_vec())),
        TriggerType::Verification,
    )
}

pub fn run(chain: &mut MemoryBlockchain, script: &[u8]) -> ExecuteScriptsResult {
    let init = invocation(script, &[]);
    engine().invoke_scripts(chain, &[Script::new(script.to_vec())], 0, &init, None)
}

pub fn run_with(
    chain: &mut MemoryBlockchain,
    script: &[u8],
    init: &ExecutionInit,
    listener: Option<&mut dyn VmListener>,
) -> ExecuteScriptsResult {
    engine().invoke_scripts(chain, &[Script::new(script.to_vec())], 0, init, listener)
}

/// Stores `script` as a contract with the given properties.
pub fn deploy(
    chain: &mut MemoryBlockchain,
    script: Vec<u8>,
    properties: ContractPropertyState,
) -> Contract {
    let contract = Contract::new(script, properties);
    chain.add_contract(contract.clone()).unwrap();
    contract
}

pub fn fault_message(result: &ExecuteScriptsResult) -> String {
    assert!(result.state.is_fault(), "expected FAULT, got {:?}", result.state);
    result.error_message.clone().unwrap_or_default()
}
