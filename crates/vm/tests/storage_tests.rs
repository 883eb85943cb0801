//! Contract storage through `Neo.Storage.*`.

mod common;

use common::{deploy, engine, fault_message, invocation, run, run_with, verification};
use neo_ledger::{Blockchain, ContractPropertyState, MemoryBlockchain, StorageFlags};
use neo_vm::{ContractParameter, OpCode, Script, ScriptBuilder};

fn put(builder: &mut ScriptBuilder, key: &str, value: &str) {
    builder
        .emit_push_string(value)
        .emit_push_string(key)
        .emit_syscall("Neo.Storage.GetContext")
        .unwrap()
        .emit_syscall("Neo.Storage.Put")
        .unwrap();
}

fn get(builder: &mut ScriptBuilder, key: &str) {
    builder
        .emit_push_string(key)
        .emit_syscall("Neo.Storage.GetContext")
        .unwrap()
        .emit_syscall("Neo.Storage.Get")
        .unwrap();
}

#[test]
fn test_put_then_get() {
    let mut chain = MemoryBlockchain::default();
    let mut builder = ScriptBuilder::new();
    put(&mut builder, "k", "v");
    get(&mut builder, "k");
    get(&mut builder, "missing");
    let contract = deploy(&mut chain, builder.into_bytes(), ContractPropertyState::HAS_STORAGE);

    let result = run(&mut chain, &contract.script);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    assert_eq!(
        result.stack,
        vec![
            ContractParameter::ByteArray(Vec::new()),
            ContractParameter::ByteArray(b"v".to_vec()),
        ]
    );
    let item = chain.try_get_storage(&contract.hash, b"k").unwrap();
    assert_eq!(item.value, b"v");
    assert_eq!(item.flags, StorageFlags::NONE);

    let engine = engine();
    let fees = &engine.config().fees;
    let expected = 2 * fees.push
        + fees.one
        + fees.storage_put(1, 1)
        + 2 * (fees.push + fees.one + fees.one_hundred);
    assert_eq!(result.gas_cost, expected);
}

#[test]
fn test_read_only_context_rejects_put() {
    let mut chain = MemoryBlockchain::default();
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push_string("v")
        .emit_push_string("k")
        .emit_syscall("Neo.Storage.GetReadOnlyContext")
        .unwrap()
        .emit_syscall("Neo.Storage.Put")
        .unwrap();
    let contract = deploy(&mut chain, builder.into_bytes(), ContractPropertyState::HAS_STORAGE);

    let result = run(&mut chain, &contract.script);
    assert!(fault_message(&result).contains("StorageContext is read only"));
    assert!(chain.try_get_storage(&contract.hash, b"k").is_none());
}

#[test]
fn test_as_read_only_rejects_delete() {
    let mut chain = MemoryBlockchain::default();
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push_string("k")
        .emit_syscall("Neo.Storage.GetContext")
        .unwrap()
        .emit_syscall("Neo.StorageContext.AsReadOnly")
        .unwrap()
        .emit_syscall("Neo.Storage.Delete")
        .unwrap();
    let contract = deploy(&mut chain, builder.into_bytes(), ContractPropertyState::HAS_STORAGE);
    let result = run(&mut chain, &contract.script);
    assert!(fault_message(&result).contains("read only"));
}

#[test]
fn test_contract_without_storage_faults() {
    let mut chain = MemoryBlockchain::default();
    let mut builder = ScriptBuilder::new();
    put(&mut builder, "k", "v");
    let contract = deploy(&mut chain, builder.into_bytes(), ContractPropertyState::NO_PROPERTY);
    let result = run(&mut chain, &contract.script);
    assert!(fault_message(&result).contains("Contract Does Not Have Storage"));

    let mut builder = ScriptBuilder::new();
    put(&mut builder, "k", "v");
    let result = run(&mut chain, &builder.into_bytes());
    assert!(fault_message(&result).contains("Contract Does Not Have Storage"));
}

#[test]
fn test_writes_need_application_trigger() {
    let mut chain = MemoryBlockchain::default();
    let mut builder = ScriptBuilder::new();
    put(&mut builder, "k", "v");
    let contract = deploy(&mut chain, builder.into_bytes(), ContractPropertyState::HAS_STORAGE);
    let result = run_with(&mut chain, &contract.script, &verification(&contract.script), None);
    assert!(fault_message(&result).contains("only available to the Application trigger"));
}

#[test]
fn test_constant_item_cannot_change() {
    let mut chain = MemoryBlockchain::default();
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push_int(StorageFlags::CONSTANT.bits() as i64)
        .emit_push_string("v")
        .emit_push_string("k")
        .emit_syscall("Neo.Storage.GetContext")
        .unwrap()
        .emit_syscall("Neo.Storage.PutEx")
        .unwrap();
    put(&mut builder, "k", "w");
    let contract = deploy(&mut chain, builder.into_bytes(), ContractPropertyState::HAS_STORAGE);

    let result = run(&mut chain, &contract.script);
    assert!(fault_message(&result).contains("Storage item is constant: 6b"));
    let item = chain.try_get_storage(&contract.hash, b"k").unwrap();
    assert_eq!(item.value, b"v");
    assert!(item.is_constant());
}

#[test]
fn test_delete_removes_row() {
    let mut chain = MemoryBlockchain::default();
    let mut builder = ScriptBuilder::new();
    put(&mut builder, "k", "v");
    builder
        .emit_push_string("k")
        .emit_syscall("Neo.Storage.GetContext")
        .unwrap()
        .emit_syscall("Neo.Storage.Delete")
        .unwrap();
    let contract = deploy(&mut chain, builder.into_bytes(), ContractPropertyState::HAS_STORAGE);
    let result = run(&mut chain, &contract.script);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    assert_eq!(chain.storage_len(&contract.hash), 0);
}

#[test]
fn test_find_iterates_prefix_in_key_order() {
    let mut chain = MemoryBlockchain::default();
    let mut builder = ScriptBuilder::new();
    put(&mut builder, "b1", "x");
    put(&mut builder, "a2", "y");
    put(&mut builder, "a1", "z");
    builder
        .emit_push_string("a")
        .emit_syscall("Neo.Storage.GetContext")
        .unwrap()
        .emit_syscall("Neo.Storage.Find")
        .unwrap()
        .emit_opcode(OpCode::DUP)
        .emit_syscall("Neo.Iterator.Next")
        .unwrap()
        .emit_opcode(OpCode::DROP)
        .emit_opcode(OpCode::DUP)
        .emit_syscall("Neo.Iterator.Key")
        .unwrap()
        .emit_opcode(OpCode::SWAP)
        .emit_syscall("Neo.Enumerator.Value")
        .unwrap();
    let contract = deploy(&mut chain, builder.into_bytes(), ContractPropertyState::HAS_STORAGE);

    let result = run(&mut chain, &contract.script);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    assert_eq!(
        result.stack,
        vec![
            ContractParameter::ByteArray(b"z".to_vec()),
            ContractParameter::ByteArray(b"a1".to_vec()),
        ]
    );
}

#[test]
fn test_storage_is_scoped_to_contract() {
    let mut chain = MemoryBlockchain::default();
    let mut writer = ScriptBuilder::new();
    put(&mut writer, "k", "v");
    let writer = deploy(&mut chain, writer.into_bytes(), ContractPropertyState::HAS_STORAGE);
    assert!(run(&mut chain, &writer.script).state.is_halt());

    let mut reader = ScriptBuilder::new();
    reader
        .emit_push_string("k")
        .emit_syscall("Neo.Storage.GetReadOnlyContext")
        .unwrap()
        .emit_syscall("Neo.Storage.Get")
        .unwrap();
    let reader = deploy(&mut chain, reader.into_bytes(), ContractPropertyState::HAS_STORAGE);
    let init = invocation(&reader.script, &[]);
    let scripts = [Script::new(reader.script.clone())];
    let result = engine().invoke_scripts(&mut chain, &scripts, 0, &init, None);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    assert_eq!(result.stack, vec![ContractParameter::ByteArray(Vec::new())]);
    assert_eq!(
        chain.try_get_storage(&writer.hash, b"k").map(|item| item.value),
        Some(b"v".to_vec())
    );
}
