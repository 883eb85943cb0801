//! Accessors of ledger entities held by interop items.

use neo_ledger::{
    Account, Asset, Attribute, Block, Contract, Header, Input, Output, Transaction,
    TransactionType,
};

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::op::{Op, OpArgs, OpInvoke, OpOutput};
use crate::stack_item::{InteropValue, StackItem};
use crate::syscall::{SysCall, SysCallTable};

pub(super) fn register(table: &mut SysCallTable) {
    let unary: [(&'static str, OpInvoke); 34] = [
        ("Neo.Header.GetHash", header_hash),
        ("Neo.Header.GetVersion", header_version),
        ("Neo.Header.GetPrevHash", header_prev_hash),
        ("Neo.Header.GetIndex", header_index),
        ("Neo.Header.GetMerkleRoot", header_merkle_root),
        ("Neo.Header.GetTimestamp", header_timestamp),
        ("Neo.Header.GetConsensusData", header_consensus_data),
        ("Neo.Header.GetNextConsensus", header_next_consensus),
        ("Neo.Block.GetTransactionCount", block_transaction_count),
        ("Neo.Block.GetTransactions", block_transactions),
        ("Neo.Transaction.GetHash", transaction_hash),
        ("Neo.Transaction.GetType", transaction_type),
        ("Neo.Transaction.GetAttributes", transaction_attributes),
        ("Neo.Transaction.GetInputs", transaction_inputs),
        ("Neo.Transaction.GetOutputs", transaction_outputs),
        ("Neo.InvocationTransaction.GetScript", invocation_script),
        ("Neo.Attribute.GetUsage", attribute_usage),
        ("Neo.Attribute.GetData", attribute_data),
        ("Neo.Input.GetHash", input_hash),
        ("Neo.Input.GetIndex", input_index),
        ("Neo.Output.GetAssetId", output_asset),
        ("Neo.Output.GetValue", output_value),
        ("Neo.Output.GetScriptHash", output_script_hash),
        ("Neo.Account.GetScriptHash", account_script_hash),
        ("Neo.Account.GetVotes", account_votes),
        ("Neo.Asset.GetAssetId", asset_id),
        ("Neo.Asset.GetAssetType", asset_type),
        ("Neo.Asset.GetAmount", asset_amount),
        ("Neo.Asset.GetAvailable", asset_available),
        ("Neo.Asset.GetPrecision", asset_precision),
        ("Neo.Asset.GetOwner", asset_owner),
        ("Neo.Asset.GetAdmin", asset_admin),
        ("Neo.Asset.GetIssuer", asset_issuer),
        ("Neo.Contract.GetScript", contract_script),
    ];
    for (name, invoke) in unary {
        table.register(SysCall::new(name, invoke).input(1).output(1));
    }

    table.register(SysCall::new("Neo.Contract.IsPayable", contract_is_payable).input(1).output(1));
    table.register(SysCall::new("Neo.Block.GetTransaction", block_transaction).input(2).output(1));
    table.register(SysCall::new("Neo.Account.GetBalance", account_balance).input(2).output(1));
    table.register(
        SysCall::new("Neo.Transaction.GetReferences", transaction_references)
            .input(1)
            .output(1)
            .price(|fees| fees.two_hundred),
    );
    table.register(
        SysCall::new("Neo.Transaction.GetUnspentCoins", transaction_unspent_coins)
            .input(1)
            .output(1)
            .price(|fees| fees.two_hundred),
    );
}

fn mismatch(item: &InteropValue, expected: &'static str) -> VmError {
    VmError::conversion(item.type_name(), expected)
}

/// Header of a header or block item.
fn header(item: &StackItem) -> VmResult<&Header> {
    match item.as_interop()? {
        InteropValue::Header(header) => Ok(header),
        InteropValue::Block(block) => Ok(&block.header),
        other => Err(mismatch(other, "Header")),
    }
}

fn block(item: &StackItem) -> VmResult<&Block> {
    match item.as_interop()? {
        InteropValue::Block(block) => Ok(block),
        other => Err(mismatch(other, "Block")),
    }
}

fn transaction(item: &StackItem) -> VmResult<&Transaction> {
    match item.as_interop()? {
        InteropValue::Transaction(transaction) => Ok(transaction),
        other => Err(mismatch(other, "Transaction")),
    }
}

fn attribute(item: &StackItem) -> VmResult<&Attribute> {
    match item.as_interop()? {
        InteropValue::Attribute(attribute) => Ok(attribute),
        other => Err(mismatch(other, "Attribute")),
    }
}

fn input(item: &StackItem) -> VmResult<&Input> {
    match item.as_interop()? {
        InteropValue::Input(input) => Ok(input),
        other => Err(mismatch(other, "Input")),
    }
}

fn output(item: &StackItem) -> VmResult<&Output> {
    match item.as_interop()? {
        InteropValue::Output(output) => Ok(output),
        other => Err(mismatch(other, "Output")),
    }
}

fn account(item: &StackItem) -> VmResult<&Account> {
    match item.as_interop()? {
        InteropValue::Account(account) => Ok(account),
        other => Err(mismatch(other, "Account")),
    }
}

fn asset(item: &StackItem) -> VmResult<&Asset> {
    match item.as_interop()? {
        InteropValue::Asset(asset) => Ok(asset),
        other => Err(mismatch(other, "Asset")),
    }
}

pub(super) fn contract(item: &StackItem) -> VmResult<&Contract> {
    match item.as_interop()? {
        InteropValue::Contract(contract) => Ok(contract),
        other => Err(mismatch(other, "Contract")),
    }
}

fn single(context: ExecutionContext, item: StackItem) -> VmResult<OpOutput> {
    Ok(OpOutput::with_results(context, vec![item]))
}

fn header_hash(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, header(&args.args[0])?.hash().into())
}

fn header_version(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, StackItem::from_int(header(&args.args[0])?.version))
}

fn header_prev_hash(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, header(&args.args[0])?.prev_hash.into())
}

fn header_index(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, StackItem::from_int(header(&args.args[0])?.index))
}

fn header_merkle_root(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, header(&args.args[0])?.merkle_root.into())
}

fn header_timestamp(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, StackItem::from_int(header(&args.args[0])?.timestamp))
}

fn header_consensus_data(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, StackItem::from_int(header(&args.args[0])?.consensus_data))
}

fn header_next_consensus(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, header(&args.args[0])?.next_consensus.into())
}

fn block_transaction_count(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let count = block(&args.args[0])?.transactions.len() as i64;
    single(context, StackItem::from_int(count))
}

fn block_transactions(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let transactions = &block(&args.args[0])?.transactions;
    if transactions.len() > machine.limits().max_array_size {
        return Err(VmError::ContainerTooLarge);
    }
    let items = transactions
        .iter()
        .map(|tx| StackItem::interop(InteropValue::Transaction(tx.clone())))
        .collect();
    single(context, StackItem::new_array(items))
}

/// `block index`: the transaction at `index`.
fn block_transaction(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let transactions = &block(&args.args[0])?.transactions;
    let index = args.args[1].as_i64()?;
    let transaction = usize::try_from(index)
        .ok()
        .and_then(|index| transactions.get(index))
        .ok_or(VmError::InvalidIndex)?;
    single(context, StackItem::interop(InteropValue::Transaction(transaction.clone())))
}

fn transaction_hash(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, transaction(&args.args[0])?.hash().into())
}

fn transaction_type(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let tx_type = transaction(&args.args[0])?.tx_type as u8;
    single(context, StackItem::from_int(tx_type))
}

/// Wraps each element as an interop item, bounded by the array limit.
fn interop_array<T: Clone>(
    machine: &Machine<'_>,
    values: &[T],
    wrap: fn(T) -> InteropValue,
) -> VmResult<StackItem> {
    if values.len() > machine.limits().max_array_size {
        return Err(VmError::ContainerTooLarge);
    }
    let items = values
        .iter()
        .cloned()
        .map(|value| StackItem::interop(wrap(value)))
        .collect();
    Ok(StackItem::new_array(items))
}

fn transaction_attributes(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let attributes = &transaction(&args.args[0])?.attributes;
    single(context, interop_array(machine, attributes, InteropValue::Attribute)?)
}

fn transaction_inputs(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let inputs = &transaction(&args.args[0])?.inputs;
    single(context, interop_array(machine, inputs, InteropValue::Input)?)
}

fn transaction_outputs(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let outputs = &transaction(&args.args[0])?.outputs;
    single(context, interop_array(machine, outputs, InteropValue::Output)?)
}

/// Outputs spent by the transaction's inputs.
fn transaction_references(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let inputs = &transaction(&args.args[0])?.inputs;
    let references = inputs
        .iter()
        .map(|input| machine.blockchain.get_output(input))
        .collect::<Result<Vec<_>, _>>()?;
    single(context, interop_array(machine, &references, InteropValue::Output)?)
}

/// Outputs of the transaction not yet spent.
fn transaction_unspent_coins(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let transaction = transaction(&args.args[0])?;
    let hash = transaction.hash();
    let unspent: Vec<Output> = transaction
        .outputs
        .iter()
        .enumerate()
        .filter(|(index, _)| {
            let input = Input {
                prev_hash: hash,
                prev_index: *index as u16,
            };
            !machine.blockchain.is_spent(&input)
        })
        .map(|(_, output)| output.clone())
        .collect();
    single(context, interop_array(machine, &unspent, InteropValue::Output)?)
}

fn invocation_script(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let transaction = transaction(&args.args[0])?;
    match (&transaction.tx_type, &transaction.script) {
        (TransactionType::Invocation, Some(script)) => {
            single(context, StackItem::from(script.as_slice()))
        }
        _ => Err(VmError::InvalidInvocationTransaction),
    }
}

fn attribute_usage(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, StackItem::from_int(attribute(&args.args[0])?.usage.0))
}

fn attribute_data(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, StackItem::from(attribute(&args.args[0])?.data.as_slice()))
}

fn input_hash(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, input(&args.args[0])?.prev_hash.into())
}

fn input_index(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, StackItem::from_int(input(&args.args[0])?.prev_index))
}

fn output_asset(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, output(&args.args[0])?.asset.into())
}

fn output_value(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, StackItem::from_int(output(&args.args[0])?.value))
}

fn output_script_hash(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, output(&args.args[0])?.address.into())
}

fn account_script_hash(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, account(&args.args[0])?.hash.into())
}

fn account_votes(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let votes = account(&args.args[0])?
        .votes
        .iter()
        .cloned()
        .map(StackItem::ECPoint)
        .collect();
    single(context, StackItem::new_array(votes))
}

/// `account asset`: the account's balance of `asset`.
fn account_balance(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let account = account(&args.args[0])?;
    let asset = args.args[1].as_uint256()?;
    single(context, StackItem::from_int(account.balance(&asset)))
}

fn asset_id(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, asset(&args.args[0])?.hash.into())
}

fn asset_type(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, StackItem::from_int(asset(&args.args[0])?.asset_type as u8))
}

fn asset_amount(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, StackItem::from_int(asset(&args.args[0])?.amount))
}

fn asset_available(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, StackItem::from_int(asset(&args.args[0])?.available))
}

fn asset_precision(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, StackItem::from_int(asset(&args.args[0])?.precision))
}

fn asset_owner(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, asset(&args.args[0])?.owner.clone().into())
}

fn asset_admin(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, asset(&args.args[0])?.admin.into())
}

fn asset_issuer(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, asset(&args.args[0])?.issuer.into())
}

fn contract_script(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, StackItem::from(contract(&args.args[0])?.script.as_slice()))
}

fn contract_is_payable(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    single(context, StackItem::from_bool(contract(&args.args[0])?.is_payable()))
}
