//! Enumerator and iterator syscalls.

use crate::error::VmResult;
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::op::{Op, OpArgs, OpOutput};
use crate::stack_item::{ItemIterator, StackItem};
use crate::syscall::{SysCall, SysCallTable};

pub(super) fn register(table: &mut SysCallTable) {
    table.register(SysCall::new("Neo.Enumerator.Create", enumerator_create).input(1).output(1));
    table.register(SysCall::new("Neo.Enumerator.Next", enumerator_next).input(1).output(1));
    table.register(SysCall::new("Neo.Enumerator.Value", enumerator_value).input(1).output(1));
    table.register(SysCall::new("Neo.Enumerator.Concat", enumerator_concat).input(2).output(1));
    table.register(SysCall::new("Neo.Iterator.Create", iterator_create).input(1).output(1));
    table.register(SysCall::new("Neo.Iterator.Key", iterator_key).input(1).output(1));
    table.register(SysCall::new("Neo.Iterator.Keys", iterator_keys).input(1).output(1));
    table.register(SysCall::new("Neo.Iterator.Values", iterator_values).input(1).output(1));
    table.register(SysCall::new("Neo.Iterator.Concat", iterator_concat).input(2).output(1));
}

fn enumerator_create(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let values = args.args[0].as_array()?;
    Ok(OpOutput::with_results(
        context,
        vec![StackItem::enumerator(ItemIterator::from_values(values))],
    ))
}

fn enumerator_next(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let advanced = args.args[0].as_enumerator()?.borrow_mut().next();
    Ok(OpOutput::with_results(context, vec![StackItem::from_bool(advanced)]))
}

fn enumerator_value(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let value = args.args[0].as_enumerator()?.borrow().value()?;
    Ok(OpOutput::with_results(context, vec![value]))
}

/// `first second`: the remaining values of `first`, then those of `second`.
fn enumerator_concat(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let second = args.args[0].as_enumerator()?;
    let first = args.args[1].as_enumerator()?;
    let joined = first.borrow().concat(&second.borrow());
    Ok(OpOutput::with_results(context, vec![StackItem::enumerator(joined)]))
}

/// Arrays iterate by position, maps by key.
fn iterator_create(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let iterator = match &args.args[0] {
        StackItem::Map(map) => ItemIterator::new(map.borrow().entries()),
        other => ItemIterator::from_values(other.as_array()?),
    };
    Ok(OpOutput::with_results(context, vec![StackItem::iterator(iterator)]))
}

fn iterator_key(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let key = args.args[0].as_iterator()?.borrow().key()?;
    Ok(OpOutput::with_results(context, vec![key]))
}

fn iterator_keys(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let keys = args.args[0].as_iterator()?.borrow().keys();
    Ok(OpOutput::with_results(context, vec![StackItem::enumerator(keys)]))
}

fn iterator_values(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let values = args.args[0].as_iterator()?.borrow().values();
    Ok(OpOutput::with_results(context, vec![StackItem::enumerator(values)]))
}

fn iterator_concat(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let second = args.args[0].as_iterator()?;
    let first = args.args[1].as_iterator()?;
    let joined = first.borrow().concat(&second.borrow());
    Ok(OpOutput::with_results(context, vec![StackItem::iterator(joined)]))
}
