//! `System.ExecutionEngine.*` syscalls.

use crate::error::VmResult;
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::op::{Op, OpArgs, OpOutput};
use crate::stack_item::{InteropValue, StackItem};
use crate::syscall::{SysCall, SysCallTable};

pub(super) fn register(table: &mut SysCallTable) {
    table.register(
        SysCall::new("System.ExecutionEngine.GetScriptContainer", get_script_container).output(1),
    );
    table.register(
        SysCall::new("System.ExecutionEngine.GetExecutingScriptHash", get_executing_script_hash)
            .output(1),
    );
    table.register(
        SysCall::new("System.ExecutionEngine.GetCallingScriptHash", get_calling_script_hash)
            .output(1),
    );
    table.register(
        SysCall::new("System.ExecutionEngine.GetEntryScriptHash", get_entry_script_hash)
            .output(1),
    );
}

fn get_script_container(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let container = InteropValue::from(&machine.init.script_container);
    Ok(OpOutput::with_results(context, vec![StackItem::interop(container)]))
}

fn get_executing_script_hash(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let hash = context.script_hash;
    Ok(OpOutput::with_results(context, vec![hash.into()]))
}

/// Empty buffer for the outermost script.
fn get_calling_script_hash(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let item = context
        .calling_script_hash
        .map_or_else(StackItem::empty, StackItem::from);
    Ok(OpOutput::with_results(context, vec![item]))
}

fn get_entry_script_hash(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let hash = context.entry_script_hash;
    Ok(OpOutput::with_results(context, vec![hash.into()]))
}
