//! `Neo.Blockchain.*` syscalls.

use neo_core::UInt256;
use neo_ledger::{Account, HashOrIndex, LedgerError};

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::op::{Op, OpArgs, OpOutput};
use crate::stack_item::{InteropValue, StackItem};
use crate::syscall::{SysCall, SysCallTable};

pub(super) fn register(table: &mut SysCallTable) {
    table.register(SysCall::new("Neo.Blockchain.GetHeight", get_height).output(1));
    table.register(
        SysCall::new("Neo.Blockchain.GetHeader", get_header)
            .input(1)
            .output(1)
            .price(|fees| fees.one_hundred),
    );
    table.register(
        SysCall::new("Neo.Blockchain.GetBlock", get_block)
            .input(1)
            .output(1)
            .price(|fees| fees.two_hundred),
    );
    table.register(
        SysCall::new("Neo.Blockchain.GetTransaction", get_transaction)
            .input(1)
            .output(1)
            .price(|fees| fees.one_hundred),
    );
    table.register(
        SysCall::new("Neo.Blockchain.GetTransactionHeight", get_transaction_height)
            .input(1)
            .output(1)
            .price(|fees| fees.one_hundred),
    );
    table.register(
        SysCall::new("Neo.Blockchain.GetAccount", get_account)
            .input(1)
            .output(1)
            .price(|fees| fees.one_hundred),
    );
    table.register(
        SysCall::new("Neo.Blockchain.GetValidators", get_validators)
            .output(1)
            .price(|fees| fees.two_hundred),
    );
    table.register(
        SysCall::new("Neo.Blockchain.GetAsset", get_asset)
            .input(1)
            .output(1)
            .price(|fees| fees.one_hundred),
    );
    table.register(
        SysCall::new("Neo.Blockchain.GetContract", get_contract)
            .input(1)
            .output(1)
            .price(|fees| fees.one_hundred),
    );
}

/// A 32 byte operand is a block hash, anything up to five bytes a height.
fn hash_or_index(bytes: &[u8]) -> Option<HashOrIndex> {
    if bytes.len() == UInt256::LENGTH {
        return UInt256::from_bytes(bytes).ok().map(HashOrIndex::Hash);
    }
    if bytes.len() <= 5 {
        let index = num_bigint::BigInt::from_signed_bytes_le(bytes);
        return u32::try_from(&index).ok().map(HashOrIndex::Index);
    }
    None
}

fn get_height(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let height = machine.blockchain.current_block().index;
    Ok(OpOutput::with_results(context, vec![StackItem::from_int(height)]))
}

fn get_header(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let key = hash_or_index(&args.args[0].as_buffer()?).ok_or(VmError::InvalidGetHeaderArguments)?;
    let header = machine.blockchain.get_header(&key)?;
    Ok(OpOutput::with_results(
        context,
        vec![StackItem::interop(InteropValue::Header(header))],
    ))
}

fn get_block(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let bytes = args.args[0].as_buffer()?;
    let key = hash_or_index(&bytes)
        .ok_or_else(|| VmError::InvalidGetBlockArguments(hex::encode(&bytes)))?;
    let block = machine.blockchain.get_block(&key)?;
    Ok(OpOutput::with_results(
        context,
        vec![StackItem::interop(InteropValue::Block(block))],
    ))
}

fn get_transaction(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let hash = args.args[0].as_uint256()?;
    let transaction = machine.blockchain.get_transaction(&hash)?;
    Ok(OpOutput::with_results(
        context,
        vec![StackItem::interop(InteropValue::Transaction(transaction))],
    ))
}

fn get_transaction_height(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let hash = args.args[0].as_uint256()?;
    let height = machine
        .blockchain
        .try_get_transaction_height(&hash)
        .ok_or_else(|| LedgerError::not_found("Transaction", hash))?;
    Ok(OpOutput::with_results(context, vec![StackItem::from_int(height)]))
}

/// Unknown accounts read as empty ones.
fn get_account(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let hash = args.args[0].as_uint160()?;
    let account = machine
        .blockchain
        .try_get_account(&hash)
        .unwrap_or_else(|| Account::new(hash));
    Ok(OpOutput::with_results(
        context,
        vec![StackItem::interop(InteropValue::Account(account))],
    ))
}

fn get_validators(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let validators = machine
        .blockchain
        .next_validators()
        .into_iter()
        .map(StackItem::ECPoint)
        .collect();
    Ok(OpOutput::with_results(context, vec![StackItem::new_array(validators)]))
}

fn get_asset(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let hash = args.args[0].as_uint256()?;
    let asset = machine.blockchain.get_asset(&hash)?;
    Ok(OpOutput::with_results(
        context,
        vec![StackItem::interop(InteropValue::Asset(asset))],
    ))
}

fn get_contract(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let hash = args.args[0].as_uint160()?;
    let contract = machine.blockchain.get_contract(&hash)?;
    Ok(OpOutput::with_results(
        context,
        vec![StackItem::interop(InteropValue::Contract(contract))],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_or_index() {
        assert_eq!(hash_or_index(&[]), Some(HashOrIndex::Index(0)));
        assert_eq!(hash_or_index(&[0x10]), Some(HashOrIndex::Index(16)));
        assert_eq!(
            hash_or_index(&[0xff, 0xff, 0xff, 0xff, 0x00]),
            Some(HashOrIndex::Index(u32::MAX))
        );
        assert_eq!(hash_or_index(&[0xff]), None);
        assert_eq!(hash_or_index(&[0u8; 6]), None);
        assert_eq!(
            hash_or_index(&[7u8; 32]),
            Some(HashOrIndex::Hash(UInt256([7u8; 32])))
        );
    }
}
