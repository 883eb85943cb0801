//! Contract deployment, migration and destruction.

mod common;

use common::{deploy, engine, fault_message, invocation, run, verification};
use neo_config::ONE_GAS;
use neo_ledger::{
    Blockchain, Contract, ContractParameterType, ContractPropertyState, MemoryBlockchain,
    StorageItem,
};
use neo_vm::{
    ContractParameter, ExecuteScriptsResult, ExecutionInit, OpCode, RecordingListener, Script,
    ScriptBuilder, VmListener,
};

/// Pushes the nine `Contract.Create` arguments, script on top.
fn push_contract_args(
    builder: &mut ScriptBuilder,
    script: &[u8],
    properties: ContractPropertyState,
) {
    builder
        .emit_push_string("description")
        .emit_push_string("dev@example.org")
        .emit_push_string("author")
        .emit_push_string("1.0")
        .emit_push_string("name")
        .emit_push_int(properties.bits() as i64)
        .emit_push_int(ContractParameterType::ByteArray as u8 as i64)
        .emit_push(&[ContractParameterType::String as u8, ContractParameterType::Array as u8])
        .emit_push(script);
}

fn run_paid(
    chain: &mut MemoryBlockchain,
    script: &[u8],
    init: &ExecutionInit,
    listener: Option<&mut dyn VmListener>,
) -> ExecuteScriptsResult {
    engine().invoke_scripts(chain, &[Script::new(script.to_vec())], 1000 * ONE_GAS, init, listener)
}

#[test]
fn test_create_contract() {
    let mut chain = MemoryBlockchain::default();
    let code = vec![OpCode::PUSH1 as u8];
    let mut builder = ScriptBuilder::new();
    push_contract_args(&mut builder, &code, ContractPropertyState::HAS_STORAGE);
    builder
        .emit_syscall("Neo.Contract.Create")
        .unwrap()
        .emit_syscall("Neo.Contract.GetScript")
        .unwrap();
    let script = builder.into_bytes();

    let result = run_paid(&mut chain, &script, &invocation(&script, &[]), None);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    assert_eq!(result.stack, vec![ContractParameter::ByteArray(code.clone())]);

    let hash = Contract::new(code, ContractPropertyState::NO_PROPERTY).hash;
    let contract = chain.try_get_contract(&hash).unwrap();
    assert!(contract.has_storage());
    assert_eq!(contract.name, "name");
    assert_eq!(contract.code_version, "1.0");
    assert_eq!(contract.return_type, ContractParameterType::ByteArray);
    assert_eq!(
        contract.parameter_list,
        vec![ContractParameterType::String, ContractParameterType::Array]
    );

    let engine = engine();
    let fees = &engine.config().fees;
    assert!(result.gas_cost > fees.contract(true, false));
    assert!(result.gas_cost < fees.contract(true, false) + ONE_GAS);
}

#[test]
fn test_create_needs_application_trigger() {
    let mut chain = MemoryBlockchain::default();
    let mut builder = ScriptBuilder::new();
    push_contract_args(&mut builder, &[0x51], ContractPropertyState::NO_PROPERTY);
    builder.emit_syscall("Neo.Contract.Create").unwrap();
    let script = builder.into_bytes();

    let result = run_paid(&mut chain, &script, &verification(&script), None);
    assert!(fault_message(&result).contains("Neo.Contract.Create"));
}

#[test]
fn test_create_without_enough_gas() {
    let mut chain = MemoryBlockchain::default();
    let mut builder = ScriptBuilder::new();
    push_contract_args(&mut builder, &[0x51], ContractPropertyState::NO_PROPERTY);
    builder.emit_syscall("Neo.Contract.Create").unwrap();
    let script = builder.into_bytes();

    let result = run(&mut chain, &script);
    assert!(fault_message(&result).contains("Out of GAS"));
    let hash = Contract::new(vec![0x51], ContractPropertyState::NO_PROPERTY).hash;
    assert!(chain.try_get_contract(&hash).is_none());
}

#[test]
fn test_storage_context_of_created_contract() {
    let mut chain = MemoryBlockchain::default();
    let code = vec![OpCode::PUSH2 as u8];
    let mut builder = ScriptBuilder::new();
    builder.emit_push_string("v").emit_push_string("k");
    push_contract_args(&mut builder, &code, ContractPropertyState::HAS_STORAGE);
    builder
        .emit_syscall("Neo.Contract.Create")
        .unwrap()
        .emit_syscall("Neo.Contract.GetStorageContext")
        .unwrap()
        .emit_syscall("Neo.Storage.Put")
        .unwrap();
    let script = builder.into_bytes();

    let result = run_paid(&mut chain, &script, &invocation(&script, &[]), None);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    let hash = Contract::new(code, ContractPropertyState::NO_PROPERTY).hash;
    assert_eq!(chain.try_get_storage(&hash, b"k").map(|item| item.value), Some(b"v".to_vec()));
}

#[test]
fn test_storage_context_of_foreign_contract_faults() {
    let mut chain = MemoryBlockchain::default();
    let other = deploy(&mut chain, vec![0x51], ContractPropertyState::HAS_STORAGE);
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(other.hash.as_bytes())
        .emit_syscall("Neo.Blockchain.GetContract")
        .unwrap()
        .emit_syscall("Neo.Contract.GetStorageContext")
        .unwrap();
    let result = run(&mut chain, &builder.into_bytes());
    assert!(fault_message(&result).contains("Invalid Contract.GetStorageContext context"));
}

#[test]
fn test_destroy_removes_contract_and_storage() {
    let mut chain = MemoryBlockchain::default();
    let mut builder = ScriptBuilder::new();
    builder.emit_syscall("Neo.Contract.Destroy").unwrap();
    let contract = deploy(&mut chain, builder.into_bytes(), ContractPropertyState::HAS_STORAGE);
    chain
        .add_storage(StorageItem::new(contract.hash, b"k".to_vec(), b"v".to_vec()))
        .unwrap();

    let result = run(&mut chain, &contract.script);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    assert!(chain.try_get_contract(&contract.hash).is_none());
    assert_eq!(chain.storage_len(&contract.hash), 0);
}

#[test]
fn test_migrate_moves_storage() {
    let mut chain = MemoryBlockchain::default();
    let new_code = vec![OpCode::PUSH3 as u8];
    let mut builder = ScriptBuilder::new();
    push_contract_args(&mut builder, &new_code, ContractPropertyState::HAS_STORAGE);
    builder.emit_syscall("Neo.Contract.Migrate").unwrap();
    let old = deploy(&mut chain, builder.into_bytes(), ContractPropertyState::HAS_STORAGE);
    chain
        .add_storage(StorageItem::new(old.hash, b"k".to_vec(), b"v".to_vec()))
        .unwrap();

    let mut listener = RecordingListener::default();
    let init = invocation(&old.script, &[]);
    let result = run_paid(&mut chain, &old.script, &init, Some(&mut listener));
    assert!(result.state.is_halt(), "{:?}", result.error_message);

    let new_hash = Contract::new(new_code, ContractPropertyState::NO_PROPERTY).hash;
    assert!(chain.try_get_contract(&old.hash).is_none());
    assert!(chain.try_get_contract(&new_hash).is_some());
    assert_eq!(chain.storage_len(&old.hash), 0);
    assert_eq!(chain.try_get_storage(&new_hash, b"k").map(|item| item.value), Some(b"v".to_vec()));
    assert_eq!(listener.migrations, vec![(old.hash, new_hash)]);
}
