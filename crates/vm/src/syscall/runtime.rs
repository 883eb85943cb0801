//! `Neo.Runtime.*` syscalls.

use log::warn;
use neo_core::UInt160;
use neo_cryptography::{verification_script_hash, ECPoint};
use neo_ledger::Blockchain;

use crate::error::VmResult;
use crate::execution_context::ExecutionContext;
use crate::execution_engine::{LogMessage, Machine, Notification};
use crate::op::{Op, OpArgs, OpOutput};
use crate::stack_item::{deserialize, serialize, ContractParameter, StackItem};
use crate::syscall::{SysCall, SysCallTable};

pub(super) fn register(table: &mut SysCallTable) {
    table.register(SysCall::new("Neo.Runtime.Platform", platform).output(1));
    table.register(SysCall::new("Neo.Runtime.GetTrigger", get_trigger).output(1));
    table.register(
        SysCall::new("Neo.Runtime.CheckWitness", check_witness_call)
            .input(1)
            .output(1)
            .price(|fees| fees.two_hundred),
    );
    table.register(SysCall::new("Neo.Runtime.Notify", notify).input(1));
    table.register(SysCall::new("Neo.Runtime.Log", log_message).input(1));
    table.register(SysCall::new("Neo.Runtime.GetTime", get_time).output(1));
    table.register(SysCall::new("Neo.Runtime.Serialize", serialize_item).input(1).output(1));
    table.register(
        SysCall::new("Neo.Runtime.Deserialize", deserialize_item)
            .input(1)
            .output(1),
    );
}

/// Returns true when the script container carries a witness for `hash`.
///
/// Always true when the engine was started with witness verification disabled.
pub fn check_witness(machine: &Machine<'_>, hash: &UInt160) -> VmResult<bool> {
    if machine.init.skip_witness_verify {
        warn!("witness verification skipped for {hash}");
        return Ok(true);
    }
    let hashes = machine
        .init
        .script_container
        .script_hashes_for_verifying(&*machine.blockchain)?;
    Ok(hashes.contains(hash))
}

/// Witness check for a public key, through its signature redeem script hash.
pub fn check_witness_public_key(machine: &Machine<'_>, public_key: &ECPoint) -> VmResult<bool> {
    check_witness(machine, &verification_script_hash(public_key))
}

fn platform(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    Ok(OpOutput::with_results(context, vec![StackItem::from("NEO")]))
}

fn get_trigger(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let trigger = machine.init.trigger as u8;
    Ok(OpOutput::with_results(context, vec![StackItem::from_int(trigger)]))
}

/// Accepts either a 33 byte public key or a script hash.
fn check_witness_call(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let bytes = args.args[0].as_buffer()?;
    let result = if bytes.len() == neo_config::ECPOINT_SIZE {
        check_witness_public_key(machine, &args.args[0].as_ecpoint()?)?
    } else {
        check_witness(machine, &args.args[0].as_uint160()?)?
    };
    Ok(OpOutput::with_results(context, vec![StackItem::from_bool(result)]))
}

fn notify(
    machine: &mut Machine<'_>,
    _: &Op,
    mut context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let notification = Notification {
        script_hash: context.script_hash,
        index: context.action_index,
        state: ContractParameter::from_stack_item(&args.args[0]),
    };
    context.action_index += 1;
    machine.notify(&notification);
    Ok(OpOutput::new(context))
}

fn log_message(
    machine: &mut Machine<'_>,
    _: &Op,
    mut context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let message = LogMessage {
        script_hash: context.script_hash,
        index: context.action_index,
        message: args.args[0].as_string()?,
    };
    context.action_index += 1;
    machine.log(&message);
    Ok(OpOutput::new(context))
}

/// Timestamp of the block being persisted, or the expected next block time.
fn get_time(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let time = match &machine.init.persisting_block {
        Some(block) => u64::from(block.header.timestamp),
        None => {
            let blockchain: &dyn Blockchain = &*machine.blockchain;
            u64::from(blockchain.current_block().timestamp)
                + blockchain.settings().seconds_per_block
        }
    };
    Ok(OpOutput::with_results(context, vec![StackItem::from_int(time)]))
}

fn serialize_item(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let bytes = serialize(&args.args[0], machine.limits().max_item_size)?;
    Ok(OpOutput::with_results(context, vec![StackItem::from(bytes)]))
}

fn deserialize_item(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let item = deserialize(&args.args[0].as_buffer()?, machine.limits())?;
    Ok(OpOutput::with_results(context, vec![item]))
}
