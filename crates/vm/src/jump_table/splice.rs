//! Splice operations for the Neo Virtual Machine.

use neo_config::FeeSchedule;

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::jump_table::stack::index_operand;
use crate::jump_table::JumpTable;
use crate::op::{Op, OpArgs, OpOutput};
use crate::op_code::OpCode;
use crate::stack_item::StackItem;

/// Registers the splice operation handlers.
pub fn register_handlers(jump_table: &mut JumpTable, fees: &FeeSchedule) {
    jump_table.register(Op::new(OpCode::CAT, fees.one, cat).input(2).output(1));
    jump_table.register(Op::new(OpCode::SUBSTR, fees.one, substr).input(3).output(1));
    jump_table.register(Op::new(OpCode::LEFT, fees.one, left).input(2).output(1));
    jump_table.register(Op::new(OpCode::RIGHT, fees.one, right).input(2).output(1));
    jump_table.register(Op::new(OpCode::SIZE, fees.one, size).input(1).output(1));
}

/// `CAT`: the second item followed by the top item.
fn cat(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let mut result = args.args[1].as_buffer()?;
    result.extend_from_slice(&args.args[0].as_buffer()?);
    if result.len() > machine.limits().max_item_size {
        return Err(VmError::ItemTooLarge);
    }
    Ok(OpOutput::with_results(context, vec![StackItem::from(result)]))
}

/// Bytes of `value` in `start..start + count`, clamped to its length.
fn clamped(value: &[u8], start: usize, count: usize) -> &[u8] {
    let start = start.min(value.len());
    let end = start.saturating_add(count).min(value.len());
    &value[start..end]
}

/// `SUBSTR`: `count` bytes of the third item starting at `start`.
fn substr(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let count = index_operand(&args.args[0])?;
    if count < 0 {
        return Err(VmError::SubstrNegativeEnd);
    }
    let start = index_operand(&args.args[1])?;
    if start < 0 {
        return Err(VmError::SubstrNegativeStart);
    }
    let value = args.args[2].as_buffer()?;
    let result = clamped(&value, start as usize, count as usize);
    Ok(OpOutput::with_results(context, vec![StackItem::from(result)]))
}

fn left(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let count = index_operand(&args.args[0])?;
    if count < 0 {
        return Err(VmError::NegativeIndex("LEFT"));
    }
    let value = args.args[1].as_buffer()?;
    let result = clamped(&value, 0, count as usize);
    Ok(OpOutput::with_results(context, vec![StackItem::from(result)]))
}

fn right(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let count = index_operand(&args.args[0])?;
    if count < 0 {
        return Err(VmError::NegativeIndex("RIGHT"));
    }
    let value = args.args[1].as_buffer()?;
    let count = count as usize;
    if value.len() < count {
        return Err(VmError::RightLength);
    }
    let result = &value[value.len() - count..];
    Ok(OpOutput::with_results(context, vec![StackItem::from(result)]))
}

fn size(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let length = args.args[0].as_buffer()?.len() as i64;
    Ok(OpOutput::with_results(context, vec![StackItem::from_int(length)]))
}
