//! The native Policy contract.

mod common;

use common::{call, chain, fault_message, COMMITTEE};
use neo_core::UInt160;
use neo_ledger::{Blockchain, MemoryBlockchain};
use neo_smart_contract::native::policy_contract::PREFIX_BLOCKED_ACCOUNTS;
use neo_smart_contract::PolicyContract;
use neo_vm::{ContractParameter, NativeContract, StackItem};
use num_bigint::BigInt;

fn int(value: i64) -> ContractParameter {
    ContractParameter::Integer(BigInt::from(value))
}

fn get(chain: &mut MemoryBlockchain, method: &str) -> ContractParameter {
    let result = call(chain, &PolicyContract::new().hash(), method, &[], &[]);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    result.stack[0].clone()
}

fn set(
    chain: &mut MemoryBlockchain,
    method: &str,
    arg: StackItem,
    witnesses: &[UInt160],
) -> ContractParameter {
    let result = call(chain, &PolicyContract::new().hash(), method, &[arg], witnesses);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    result.stack[0].clone()
}

#[test]
fn test_defaults() {
    let mut chain = chain();
    assert_eq!(get(&mut chain, "getMaxBlockSize"), int(262_144));
    assert_eq!(get(&mut chain, "getMaxTransactionsPerBlock"), int(512));
    assert_eq!(get(&mut chain, "getFeePerByte"), int(1000));
    assert_eq!(get(&mut chain, "getBlockedAccounts"), ContractParameter::Array(Vec::new()));
}

#[test]
fn test_setters_need_committee_witness() {
    let mut chain = chain();
    let denied = set(&mut chain, "setFeePerByte", StackItem::from_int(5), &[UInt160([1; 20])]);
    assert_eq!(denied, ContractParameter::Boolean(false));
    assert_eq!(get(&mut chain, "getFeePerByte"), int(1000));

    let accepted = set(&mut chain, "setFeePerByte", StackItem::from_int(5), &[COMMITTEE]);
    assert_eq!(accepted, ContractParameter::Boolean(true));
    assert_eq!(get(&mut chain, "getFeePerByte"), int(5));

    set(&mut chain, "setMaxTransactionsPerBlock", StackItem::from_int(9), &[COMMITTEE]);
    set(&mut chain, "setMaxBlockSize", StackItem::from_int(4096), &[COMMITTEE]);
    assert_eq!(get(&mut chain, "getMaxTransactionsPerBlock"), int(9));
    assert_eq!(get(&mut chain, "getMaxBlockSize"), int(4096));
}

#[test]
fn test_block_size_above_payload_limit_faults() {
    let mut chain = chain();
    let result = call(
        &mut chain,
        &PolicyContract::new().hash(),
        "setMaxBlockSize",
        &[StackItem::from_int(0x0200_0001)],
        &[COMMITTEE],
    );
    assert!(fault_message(&result).contains("Max payload size exceeded"));
    assert_eq!(get(&mut chain, "getMaxBlockSize"), int(262_144));
}

#[test]
fn test_blocked_accounts_are_deduplicated() {
    let mut chain = chain();
    let (a, b) = (UInt160([1; 20]), UInt160([2; 20]));
    for account in [a, b, a] {
        let result = set(&mut chain, "blockAccount", StackItem::from(account), &[COMMITTEE]);
        assert_eq!(result, ContractParameter::Boolean(true));
    }
    assert_eq!(
        get(&mut chain, "getBlockedAccounts"),
        ContractParameter::Array(vec![ContractParameter::Hash160(a), ContractParameter::Hash160(b)])
    );
    let row = chain
        .try_get_storage(&PolicyContract::new().hash(), &[PREFIX_BLOCKED_ACCOUNTS])
        .unwrap();
    assert_eq!(row.value.len(), 40);

    set(&mut chain, "unblockAccount", StackItem::from(a), &[COMMITTEE]);
    set(&mut chain, "unblockAccount", StackItem::from(a), &[COMMITTEE]);
    assert_eq!(
        get(&mut chain, "getBlockedAccounts"),
        ContractParameter::Array(vec![ContractParameter::Hash160(b)])
    );
}

#[test]
fn test_block_account_without_witness_fails() {
    let mut chain = chain();
    let result = set(&mut chain, "blockAccount", StackItem::from(UInt160([3; 20])), &[]);
    assert_eq!(result, ContractParameter::Boolean(false));
    assert_eq!(get(&mut chain, "getBlockedAccounts"), ContractParameter::Array(Vec::new()));
}
