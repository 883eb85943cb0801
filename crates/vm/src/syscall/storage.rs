//! `Neo.Storage.*` syscalls.
//!
//! Rows are keyed by the owning contract's script hash. Writes are limited to the
//! application trigger and to contracts declaring storage.

use neo_core::UInt160;
use neo_ledger::{StorageFlags, StorageItem};

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::op::{Op, OpArgs, OpOutput};
use crate::stack_item::{ItemIterator, StackItem, StorageContext};
use crate::syscall::{require_application, SysCall, SysCallTable};

pub(super) fn register(table: &mut SysCallTable) {
    table.register(SysCall::new("Neo.Storage.GetContext", get_context).output(1));
    table.register(
        SysCall::new("Neo.Storage.GetReadOnlyContext", get_read_only_context).output(1),
    );
    table.register(SysCall::new("Neo.StorageContext.AsReadOnly", as_read_only).input(1).output(1));
    table.register(
        SysCall::new("Neo.Storage.Get", get)
            .input(2)
            .output(1)
            .price(|fees| fees.one_hundred),
    );
    table.register(SysCall::new("Neo.Storage.Find", find).input(2).output(1));
    table.register(
        SysCall::new("Neo.Storage.Put", put)
            .input(3)
            .dynamic_price(|machine, context| put_price(machine, context, 3)),
    );
    table.register(
        SysCall::new("Neo.Storage.PutEx", put)
            .input(4)
            .dynamic_price(|machine, context| put_price(machine, context, 4)),
    );
    table.register(
        SysCall::new("Neo.Storage.Delete", delete)
            .input(2)
            .price(|fees| fees.one_hundred),
    );
}

/// Priced by the combined key and value length.
fn put_price(machine: &Machine<'_>, context: &ExecutionContext, input: usize) -> VmResult<i64> {
    match (context.peek(1), context.peek(2)) {
        (Some(key), Some(value)) => {
            let key_len = key.as_buffer()?.len();
            let value_len = value.as_buffer()?.len();
            Ok(machine.fees().storage_put(key_len, value_len))
        }
        _ => Err(VmError::stack_underflow("SYSCALL", context.stack.len(), input)),
    }
}

/// Fails unless the contract behind `hash` declares storage.
pub(super) fn check_storage(machine: &Machine<'_>, hash: &UInt160) -> VmResult<()> {
    match machine.blockchain.try_get_contract(hash) {
        Some(contract) if contract.has_storage() => Ok(()),
        _ => Err(VmError::ContractNoStorage(*hash)),
    }
}

fn writable_context(machine: &Machine<'_>, op: &Op, item: &StackItem) -> VmResult<StorageContext> {
    require_application(machine, &op.name)?;
    let context = item.as_storage_context()?;
    if context.read_only {
        return Err(VmError::ReadOnlyStorageContext);
    }
    check_storage(machine, &context.script_hash)?;
    Ok(context)
}

fn get_context(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let storage = StorageContext::new(context.script_hash, false);
    Ok(OpOutput::with_results(context, vec![StackItem::StorageContext(storage)]))
}

fn get_read_only_context(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let storage = StorageContext::new(context.script_hash, true);
    Ok(OpOutput::with_results(context, vec![StackItem::StorageContext(storage)]))
}

fn as_read_only(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let storage = args.args[0].as_storage_context()?;
    let storage = StorageContext::new(storage.script_hash, true);
    Ok(OpOutput::with_results(context, vec![StackItem::StorageContext(storage)]))
}

/// Missing keys read as an empty buffer.
fn get(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let storage = args.args[0].as_storage_context()?;
    check_storage(machine, &storage.script_hash)?;
    let key = args.args[1].as_buffer()?;
    let value = machine
        .blockchain
        .try_get_storage(&storage.script_hash, &key)
        .map(|item| item.value)
        .unwrap_or_default();
    Ok(OpOutput::with_results(context, vec![StackItem::from(value)]))
}

/// Iterator over the rows whose key starts with the given prefix.
fn find(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let storage = args.args[0].as_storage_context()?;
    check_storage(machine, &storage.script_hash)?;
    let prefix = args.args[1].as_buffer()?;
    let entries = machine
        .blockchain
        .find_storage(&storage.script_hash, &prefix)
        .into_iter()
        .map(|item| (StackItem::from(item.key), StackItem::from(item.value)))
        .collect();
    Ok(OpOutput::with_results(
        context,
        vec![StackItem::iterator(ItemIterator::new(entries))],
    ))
}

/// `Put context key value` and `PutEx context key value flags`.
fn put(
    machine: &mut Machine<'_>,
    op: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let storage = writable_context(machine, op, &args.args[0])?;
    let key = args.args[1].as_buffer()?;
    if key.len() > machine.limits().max_storage_key_size {
        return Err(VmError::ItemTooLarge);
    }
    let value = args.args[2].as_buffer()?;
    let flags = match args.args.get(3) {
        Some(flags) => {
            let bits = flags.as_i64()?;
            u8::try_from(bits)
                .ok()
                .and_then(StorageFlags::from_bits)
                .ok_or_else(|| VmError::InvalidEnumValue {
                    kind: "StorageFlags",
                    value: bits.to_string(),
                })?
        }
        None => StorageFlags::NONE,
    };

    let hash = storage.script_hash;
    match machine.blockchain.try_get_storage(&hash, &key) {
        Some(existing) if existing.is_constant() => {
            return Err(VmError::ConstantStorage(hex::encode(&key)));
        }
        Some(_) => {
            machine
                .blockchain
                .update_storage(StorageItem { hash, key, value, flags })?;
        }
        None => {
            machine
                .blockchain
                .add_storage(StorageItem { hash, key, value, flags })?;
        }
    }
    Ok(OpOutput::new(context))
}

fn delete(
    machine: &mut Machine<'_>,
    op: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let storage = writable_context(machine, op, &args.args[0])?;
    let key = args.args[1].as_buffer()?;
    if let Some(existing) = machine.blockchain.try_get_storage(&storage.script_hash, &key) {
        if existing.is_constant() {
            return Err(VmError::ConstantStorage(hex::encode(&key)));
        }
        machine.blockchain.delete_storage(&storage.script_hash, &key);
    }
    Ok(OpOutput::new(context))
}
