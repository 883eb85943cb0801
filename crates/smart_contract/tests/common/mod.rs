#![allow(dead_code)]

use neo_config::VmConfig;
use neo_core::UInt160;
use neo_ledger::{
    Attribute, AttributeUsage, Block, Header, MemoryBlockchain, ScriptContainer, Transaction,
};
use neo_smart_contract::natives;
use neo_vm::{
    ExecuteScriptsResult, ExecutionEngine, ExecutionInit, Script, ScriptBuilder, StackItem,
    TriggerType, VmListener,
};

/// Consensus address of the current block in every test ledger.
pub const COMMITTEE: UInt160 = UInt160([7; 20]);

pub fn engine() -> ExecutionEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    ExecutionEngine::with_natives(VmConfig::default(), natives())
}

/// A ledger whose current block names [`COMMITTEE`], with native genesis state written.
pub fn chain() -> MemoryBlockchain {
    let mut chain = MemoryBlockchain::default();
    let header = Header {
        next_consensus: COMMITTEE,
        ..Header::default()
    };
    chain.persist_block(Block::new(header, Vec::new()));
    engine()
        .initialize_natives(&mut chain, &invocation(&[], &[]), None)
        .unwrap();
    chain
}

pub fn invocation(script: &[u8], witnesses: &[UInt160]) -> ExecutionInit {
    ExecutionInit::new(
        ScriptContainer::Transaction(witnessed(script, witnesses)),
        TriggerType::Application,
    )
}

pub fn witnessed(script: &[u8], witnesses: &[UInt160]) -> Transaction {
    let mut tx = Transaction::invocation(script.to_vec());
    tx.attributes = witnesses
        .iter()
        .map(|hash| Attribute {
            usage: AttributeUsage::SCRIPT,
            data: hash.to_array().to_vec(),
        })
        .collect();
    tx
}

pub fn call_script(hash: &UInt160, method: &str, args: &[StackItem]) -> Vec<u8> {
    let mut builder = ScriptBuilder::new();
    builder.emit_app_call_with_args(hash, method, args).unwrap();
    builder.into_bytes()
}

pub fn run_with(
    chain: &mut MemoryBlockchain,
    script: &[u8],
    init: &ExecutionInit,
    listener: Option<&mut dyn VmListener>,
) -> ExecuteScriptsResult {
    engine().invoke_scripts(chain, &[Script::new(script.to_vec())], 0, init, listener)
}

/// Calls `method` on the native at `hash` in an application run witnessed by `witnesses`.
pub fn call(
    chain: &mut MemoryBlockchain,
    hash: &UInt160,
    method: &str,
    args: &[StackItem],
    witnesses: &[UInt160],
) -> ExecuteScriptsResult {
    let script = call_script(hash, method, args);
    run_with(chain, &script, &invocation(&script, witnesses), None)
}

pub fn fault_message(result: &ExecuteScriptsResult) -> String {
    assert!(result.state.is_fault(), "expected FAULT, got {:?}", result.state);
    result.error_message.clone().unwrap_or_default()
}
