//! NEP-5 behaviour of the native NEO and GAS tokens.

mod common;

use std::rc::Rc;

use common::{call, call_script, chain, engine, fault_message, invocation, run_with, COMMITTEE};
use neo_core::UInt160;
use neo_ledger::{
    Blockchain, Contract, ContractPropertyState, MemoryBlockchain, ScriptContainer, Transaction,
};
use neo_smart_contract::native::nep5::account_key;
use neo_smart_contract::{GasToken, NeoToken};
use neo_vm::execution_context::ScriptOptions;
use neo_vm::{
    BalanceChange, ContractParameter, ExecutionContext, ExecutionInit, NativeContract,
    RecordingListener, StackItem, TriggerType,
};
use num_bigint::BigInt;

const ALICE: UInt160 = UInt160([0xa1; 20]);
const BOB: UInt160 = UInt160([0xb0; 20]);

fn int(value: i64) -> ContractParameter {
    ContractParameter::Integer(BigInt::from(value))
}

fn transfer_args(from: UInt160, to: UInt160, amount: i64) -> Vec<StackItem> {
    vec![StackItem::from(from), StackItem::from(to), StackItem::from_int(amount)]
}

fn balance(chain: &mut MemoryBlockchain, token: &UInt160, account: UInt160) -> ContractParameter {
    let result = call(chain, token, "balanceOf", &[StackItem::from(account)], &[]);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    result.stack[0].clone()
}

fn transfer(
    chain: &mut MemoryBlockchain,
    token: &UInt160,
    from: UInt160,
    to: UInt160,
    amount: i64,
) -> ContractParameter {
    let result = call(chain, token, "transfer", &transfer_args(from, to, amount), &[from]);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    result.stack[0].clone()
}

#[test]
fn test_genesis_supply() {
    let mut chain = chain();
    let neo = NeoToken::new().hash();
    let gas = GasToken::new().hash();

    assert_eq!(balance(&mut chain, &neo, COMMITTEE), int(100_000_000));
    let result = call(&mut chain, &neo, "totalSupply", &[], &[]);
    assert_eq!(result.stack, vec![int(100_000_000)]);
    let result = call(&mut chain, &gas, "totalSupply", &[], &[]);
    assert_eq!(result.stack, vec![int(30_000_000 * 100_000_000)]);
}

#[test]
fn test_initialize_is_idempotent() {
    let mut chain = chain();
    engine()
        .initialize_natives(&mut chain, &invocation(&[], &[]), None)
        .unwrap();
    let neo = NeoToken::new().hash();
    assert_eq!(balance(&mut chain, &neo, COMMITTEE), int(100_000_000));
}

#[test]
fn test_metadata() {
    let mut chain = chain();
    let gas = GasToken::new().hash();
    let name = call(&mut chain, &gas, "name", &[], &[]);
    let symbol = call(&mut chain, &gas, "symbol", &[], &[]);
    let decimals = call(&mut chain, &gas, "decimals", &[], &[]);
    assert_eq!(name.stack, vec![ContractParameter::ByteArray(b"GAS".to_vec())]);
    assert_eq!(symbol.stack, vec![ContractParameter::ByteArray(b"gas".to_vec())]);
    assert_eq!(decimals.stack, vec![int(8)]);
}

#[test]
fn test_transfer_moves_balance_and_reports_it() {
    let mut chain = chain();
    let neo = NeoToken::new().hash();
    let script = call_script(&neo, "transfer", &transfer_args(COMMITTEE, ALICE, 40));
    let mut listener = RecordingListener::default();
    let init = invocation(&script, &[COMMITTEE]);
    let result = run_with(&mut chain, &script, &init, Some(&mut listener));
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    assert_eq!(result.stack, vec![ContractParameter::Boolean(true)]);

    assert_eq!(balance(&mut chain, &neo, COMMITTEE), int(100_000_000 - 40));
    assert_eq!(balance(&mut chain, &neo, ALICE), int(40));
    assert_eq!(
        listener.balance_changes,
        vec![
            BalanceChange { asset: neo, address: COMMITTEE, amount: BigInt::from(-40) },
            BalanceChange { asset: neo, address: ALICE, amount: BigInt::from(40) },
        ]
    );
    assert_eq!(listener.notifications.len(), 1);
    assert_eq!(listener.notifications[0].script_hash, neo);
    assert_eq!(
        listener.notifications[0].state,
        ContractParameter::Array(vec![
            ContractParameter::String("Transfer".to_string()),
            ContractParameter::Hash160(COMMITTEE),
            ContractParameter::Hash160(ALICE),
            int(40),
        ])
    );
}

#[test]
fn test_transfer_without_witness_fails() {
    let mut chain = chain();
    let neo = NeoToken::new().hash();
    let result = call(&mut chain, &neo, "transfer", &transfer_args(COMMITTEE, ALICE, 1), &[]);
    assert_eq!(result.stack, vec![ContractParameter::Boolean(false)]);
    assert_eq!(balance(&mut chain, &neo, ALICE), int(0));
}

#[test]
fn test_zero_transfer_from_missing_account_is_noop() {
    let mut chain = chain();
    let gas = GasToken::new().hash();
    let script = call_script(&gas, "transfer", &transfer_args(ALICE, BOB, 0));
    let mut listener = RecordingListener::default();
    let result = run_with(&mut chain, &script, &invocation(&script, &[ALICE]), Some(&mut listener));
    assert_eq!(result.stack, vec![ContractParameter::Boolean(true)]);
    assert!(listener.balance_changes.is_empty());
    assert!(chain.try_get_storage(&gas, &account_key(&ALICE)).is_none());
    assert!(chain.try_get_storage(&gas, &account_key(&BOB)).is_none());
}

#[test]
fn test_full_balance_transfer_deletes_sender_row() {
    let mut chain = chain();
    let neo = NeoToken::new().hash();
    assert_eq!(transfer(&mut chain, &neo, COMMITTEE, ALICE, 10), ContractParameter::Boolean(true));
    assert_eq!(transfer(&mut chain, &neo, ALICE, BOB, 10), ContractParameter::Boolean(true));
    assert!(chain.try_get_storage(&neo, &account_key(&ALICE)).is_none());
    assert_eq!(balance(&mut chain, &neo, BOB), int(10));
}

#[test]
fn test_insufficient_balance_fails() {
    let mut chain = chain();
    let neo = NeoToken::new().hash();
    assert_eq!(transfer(&mut chain, &neo, COMMITTEE, ALICE, 5), ContractParameter::Boolean(true));
    assert_eq!(transfer(&mut chain, &neo, ALICE, BOB, 6), ContractParameter::Boolean(false));
    assert_eq!(transfer(&mut chain, &neo, BOB, ALICE, 1), ContractParameter::Boolean(false));
    assert_eq!(balance(&mut chain, &neo, ALICE), int(5));
}

#[test]
fn test_self_transfer_keeps_balance() {
    let mut chain = chain();
    let neo = NeoToken::new().hash();
    assert_eq!(
        transfer(&mut chain, &neo, COMMITTEE, COMMITTEE, 7),
        ContractParameter::Boolean(true)
    );
    assert_eq!(balance(&mut chain, &neo, COMMITTEE), int(100_000_000));
}

#[test]
fn test_negative_amount_faults() {
    let mut chain = chain();
    let neo = NeoToken::new().hash();
    let args = transfer_args(COMMITTEE, ALICE, -1);
    let result = call(&mut chain, &neo, "transfer", &args, &[COMMITTEE]);
    assert!(fault_message(&result).contains("Invalid amount"));
}

#[test]
fn test_receiving_contract_must_be_payable() {
    let mut chain = chain();
    let neo = NeoToken::new().hash();
    let closed = Contract::new(vec![0x51], ContractPropertyState::NO_PROPERTY);
    let open = Contract::new(vec![0x52], ContractPropertyState::PAYABLE);
    chain.add_contract(closed.clone()).unwrap();
    chain.add_contract(open.clone()).unwrap();

    assert_eq!(
        transfer(&mut chain, &neo, COMMITTEE, closed.hash, 1),
        ContractParameter::Boolean(false)
    );
    assert_eq!(
        transfer(&mut chain, &neo, COMMITTEE, open.hash, 1),
        ContractParameter::Boolean(true)
    );
    assert_eq!(balance(&mut chain, &neo, open.hash), int(1));
}

#[test]
fn test_transfer_needs_application_trigger() {
    let mut chain = chain();
    let neo = NeoToken::new().hash();
    let script = call_script(&neo, "transfer", &transfer_args(COMMITTEE, ALICE, 1));
    let init = ExecutionInit::new(
        ScriptContainer::Transaction(Transaction::invocation(script.clone())),
        TriggerType::Verification,
    );
    let result = run_with(&mut chain, &script, &init, None);
    assert!(fault_message(&result).contains("only available to the Application trigger"));

    let script = call_script(&neo, "balanceOf", &[StackItem::from(COMMITTEE)]);
    let result = run_with(&mut chain, &script, &init, None);
    assert_eq!(result.stack, vec![int(100_000_000)]);
}

#[test]
fn test_unknown_method_faults() {
    let mut chain = chain();
    let neo = NeoToken::new().hash();
    let result = call(&mut chain, &neo, "mint", &[], &[]);
    assert!(fault_message(&result).contains("Unknown method mint"));
}

#[test]
fn test_method_price_is_charged() {
    let mut chain = chain();
    let neo = NeoToken::new().hash();
    let priced = call(&mut chain, &neo, "totalSupply", &[], &[]);
    let free = call(&mut chain, &neo, "decimals", &[], &[]);
    assert!(priced.state.is_halt() && free.state.is_halt());
    assert_eq!(priced.gas_cost - free.gas_cost, 1_000_000);
}

#[test]
fn test_mint_then_burn_restores_supply() {
    let mut chain = chain();
    let gas = GasToken::new();
    let engine = engine();
    let init = invocation(&[], &[]);
    let mut listener = RecordingListener::default();
    let before = gas.total_supply(&engine.machine(&mut chain, &init, None));

    {
        let mut machine = engine.machine(&mut chain, &init, Some(&mut listener));
        let mut context = ExecutionContext::new(
            Rc::from(Vec::new()),
            false,
            ScriptOptions::new(UInt160::zero(), 0),
        );
        gas.mint(&mut machine, &mut context, ALICE, &BigInt::from(500)).unwrap();
        assert_eq!(gas.balance_of(&machine, &ALICE), BigInt::from(500));
        assert_eq!(gas.total_supply(&machine), &before + BigInt::from(500));

        assert!(gas.burn(&mut machine, &mut context, ALICE, &BigInt::from(501)).is_err());
        gas.burn(&mut machine, &mut context, ALICE, &BigInt::from(500)).unwrap();
        assert_eq!(gas.total_supply(&machine), before);
    }
    assert!(chain.try_get_storage(&gas.hash(), &account_key(&ALICE)).is_none());
    assert_eq!(listener.balance_changes.len(), 2);
    assert_eq!(listener.notifications.len(), 2);
}
