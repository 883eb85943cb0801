//! Multi-script invocations, subroutine calls and null items.

mod common;

use common::{engine, invocation, run};
use neo_ledger::MemoryBlockchain;
use neo_vm::{script_hash, ContractParameter, OpCode, Script, ScriptBuilder};
use num_bigint::BigInt;

fn int(value: i64) -> ContractParameter {
    ContractParameter::Integer(BigInt::from(value))
}

fn syscalls(names: &[&str]) -> Vec<u8> {
    let mut builder = ScriptBuilder::new();
    for name in names {
        builder.emit_syscall(name).unwrap();
    }
    builder.into_bytes()
}

#[test]
fn test_scripts_run_in_order_on_shared_stack() {
    let mut chain = MemoryBlockchain::default();
    let scripts = [
        Script::new(vec![OpCode::PUSH2 as u8, OpCode::PUSH3 as u8]),
        Script::new(vec![OpCode::ADD as u8]),
    ];
    let init = invocation(&scripts[1].code, &[]);
    let result = engine().invoke_scripts(&mut chain, &scripts, 0, &init, None);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    assert_eq!(result.stack, vec![int(5)]);
    assert_eq!(result.gas_cost, 3 * engine().config().fees.one);
}

#[test]
fn test_entry_hash_is_last_script_and_caller_is_next_script() {
    let mut chain = MemoryBlockchain::default();
    let first = syscalls(&[
        "System.ExecutionEngine.GetExecutingScriptHash",
        "System.ExecutionEngine.GetCallingScriptHash",
        "System.ExecutionEngine.GetEntryScriptHash",
    ]);
    let last = syscalls(&["System.ExecutionEngine.GetCallingScriptHash"]);
    let scripts = [Script::new(first.clone()), Script::new(last.clone())];
    let init = invocation(&last, &[]);

    let result = engine().invoke_scripts(&mut chain, &scripts, 0, &init, None);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    assert_eq!(
        result.stack,
        vec![
            ContractParameter::ByteArray(Vec::new()),
            ContractParameter::Hash160(script_hash(&last)),
            ContractParameter::Hash160(script_hash(&last)),
            ContractParameter::Hash160(script_hash(&first)),
        ]
    );
}

#[test]
fn test_run_stops_at_first_fault() {
    let mut chain = MemoryBlockchain::default();
    let scripts = [
        Script::new(vec![OpCode::PUSH1 as u8, OpCode::THROW as u8]),
        Script::new(vec![OpCode::PUSH2 as u8]),
    ];
    let init = invocation(&scripts[1].code, &[]);
    let result = engine().invoke_scripts(&mut chain, &scripts, 0, &init, None);
    assert!(result.state.is_fault());
    assert_eq!(result.stack, vec![int(1)]);
}

#[test]
fn test_call_reports_running_script_as_caller() {
    let mut chain = MemoryBlockchain::default();
    // 0: CALL +4 | 3: RET | 4: SYSCALL GetCallingScriptHash, RET
    let mut builder = ScriptBuilder::new();
    builder
        .emit_jump(OpCode::CALL, 4)
        .unwrap()
        .emit_opcode(OpCode::RET)
        .emit_syscall("System.ExecutionEngine.GetCallingScriptHash")
        .unwrap()
        .emit_opcode(OpCode::RET);
    let script = builder.into_bytes();

    let result = run(&mut chain, &script);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    assert_eq!(result.stack, vec![ContractParameter::Hash160(script_hash(&script))]);
}

#[test]
fn test_is_null() {
    let mut chain = MemoryBlockchain::default();
    let script = vec![
        OpCode::PUSHNULL as u8,
        OpCode::ISNULL as u8,
        OpCode::PUSH0 as u8,
        OpCode::ISNULL as u8,
        OpCode::PUSHNULL as u8,
    ];
    let result = run(&mut chain, &script);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    assert_eq!(
        result.stack,
        vec![
            ContractParameter::Void,
            ContractParameter::Boolean(false),
            ContractParameter::Boolean(true),
        ]
    );
}

#[test]
fn test_null_is_not_a_buffer() {
    let mut chain = MemoryBlockchain::default();
    let script = vec![OpCode::PUSHNULL as u8, OpCode::SIZE as u8];
    let result = run(&mut chain, &script);
    assert!(result.state.is_fault());
    assert_eq!(result.stack, vec![ContractParameter::Void]);
}
