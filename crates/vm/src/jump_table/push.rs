//! Push operations for the Neo Virtual Machine.

use neo_config::FeeSchedule;
use neo_io::MemoryReader;

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::jump_table::JumpTable;
use crate::op::{Op, OpArgs, OpOutput, Operand};
use crate::op_code::OpCode;
use crate::stack_item::StackItem;

/// Registers the push operation handlers.
pub fn register_handlers(jump_table: &mut JumpTable, fees: &FeeSchedule) {
    jump_table.register(Op::new(OpCode::PUSH0, fees.push, push0).output(1));
    for size in 1..=OpCode::PUSHBYTES75 as u8 {
        if let Some(opcode) = OpCode::from_u8(size) {
            jump_table.register(
                Op::new(opcode, fees.push, push_bytes)
                    .output(1)
                    .item(size as usize),
            );
        }
    }
    jump_table.register_dynamic(OpCode::PUSHDATA1, push_data1);
    jump_table.register_dynamic(OpCode::PUSHDATA2, push_data2);
    jump_table.register_dynamic(OpCode::PUSHDATA4, push_data4);
    jump_table.register(Op::new(OpCode::PUSHM1, fees.push, push_number).output(1));
    jump_table.register(Op::new(OpCode::PUSHNULL, fees.push, push_null).output(1));
    for byte in OpCode::PUSH1 as u8..=OpCode::PUSH16 as u8 {
        if let Some(opcode) = OpCode::from_u8(byte) {
            jump_table.register(Op::new(opcode, fees.push, push_number).output(1));
        }
    }
}

fn push0(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, _: OpArgs) -> VmResult<OpOutput> {
    Ok(OpOutput::with_results(context, vec![StackItem::empty()]))
}

fn push_null(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    Ok(OpOutput::with_results(context, vec![StackItem::Null]))
}

/// PUSHBYTES1-75: the opcode is the number of bytes that follow.
fn push_bytes(
    _: &mut Machine<'_>,
    op: &Op,
    mut context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let end = context.pc + op.opcode as usize;
    if end > context.code.len() {
        return Err(VmError::CodeOverflow);
    }
    let value = StackItem::from(&context.code[context.pc..end]);
    context.pc = end;
    Ok(OpOutput::with_results(context, vec![value]))
}

fn push_data1(machine: &Machine<'_>, context: &mut ExecutionContext) -> VmResult<Op> {
    push_data(machine, context, OpCode::PUSHDATA1)
}

fn push_data2(machine: &Machine<'_>, context: &mut ExecutionContext) -> VmResult<Op> {
    push_data(machine, context, OpCode::PUSHDATA2)
}

fn push_data4(machine: &Machine<'_>, context: &mut ExecutionContext) -> VmResult<Op> {
    push_data(machine, context, OpCode::PUSHDATA4)
}

fn size_prefix_length(opcode: u8) -> usize {
    match OpCode::from_u8(opcode) {
        Some(OpCode::PUSHDATA1) => 1,
        Some(OpCode::PUSHDATA2) => 2,
        _ => 4,
    }
}

fn push_data(
    machine: &Machine<'_>,
    context: &mut ExecutionContext,
    opcode: OpCode,
) -> VmResult<Op> {
    let mut reader = MemoryReader::with_position(&context.code, context.pc);
    let size = match opcode {
        OpCode::PUSHDATA1 => reader.read_u8().ok().map(usize::from),
        OpCode::PUSHDATA2 => reader.read_u16().ok().map(usize::from),
        _ => reader
            .read_i32()
            .ok()
            .and_then(|size| usize::try_from(size).ok()),
    }
    .ok_or(VmError::CodeOverflow)?;

    Ok(Op::new(opcode, machine.fees().push, push_data_invoke)
        .output(1)
        .item(size)
        .operand(Operand::Size(size)))
}

fn push_data_invoke(
    _: &mut Machine<'_>,
    op: &Op,
    mut context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let Operand::Size(size) = op.operand else {
        return Err(VmError::UnknownOp(op.opcode));
    };
    let prefix = size_prefix_length(op.opcode);
    let len = context.code.len();
    let start = context.pc + prefix;
    if len + 1 < start + size {
        return Err(VmError::CodeOverflow);
    }
    let end = (start + size).min(len);
    let value = StackItem::from(context.code.get(start..end).unwrap_or(&[]));
    context.pc = start + size;
    Ok(OpOutput::with_results(context, vec![value]))
}

/// PUSHM1 and PUSH1-16.
fn push_number(
    _: &mut Machine<'_>,
    op: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let value = i64::from(op.opcode) - i64::from(OpCode::PUSH1 as u8) + 1;
    Ok(OpOutput::with_results(context, vec![StackItem::from_int(value)]))
}
