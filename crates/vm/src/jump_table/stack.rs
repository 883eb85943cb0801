//! Stack operations for the Neo Virtual Machine.
//!
//! Index operands count from the top of the evaluation stack after the operand itself
//! has been popped. Every index is validated before the stack is touched.

use neo_config::FeeSchedule;

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::jump_table::JumpTable;
use crate::op::{Op, OpArgs, OpOutput};
use crate::op_code::OpCode;
use crate::stack_item::StackItem;

/// Registers the stack operation handlers.
pub fn register_handlers(jump_table: &mut JumpTable, fees: &FeeSchedule) {
    let one = fees.one;
    jump_table.register(
        Op::new(OpCode::DUPFROMALTSTACK, one, dup_from_alt_stack)
            .input_alt(1)
            .output(1)
            .output_alt(1),
    );
    jump_table.register(
        Op::new(OpCode::TOALTSTACK, one, to_alt_stack)
            .input(1)
            .output_alt(1),
    );
    jump_table.register(
        Op::new(OpCode::FROMALTSTACK, one, from_alt_stack)
            .input_alt(1)
            .output(1),
    );
    jump_table.register(Op::new(OpCode::XDROP, one, xdrop).input(1).modify(-1));
    jump_table.register(
        Op::new(OpCode::DUPFROMALTSTACKBOTTOM, one, dup_from_alt_stack_bottom).output(1),
    );
    jump_table.register(Op::new(OpCode::ISNULL, one, is_null).input(1).output(1));
    jump_table.register(Op::new(OpCode::XSWAP, one, xswap).input(1));
    jump_table.register(Op::new(OpCode::XTUCK, one, xtuck).input(1).modify(1));
    jump_table.register(Op::new(OpCode::DEPTH, one, depth).output(1));
    jump_table.register(Op::new(OpCode::DROP, one, drop).input(1));
    jump_table.register(Op::new(OpCode::DUP, one, dup).input(1).output(2));
    jump_table.register(Op::new(OpCode::NIP, one, nip).input(2).output(1));
    jump_table.register(Op::new(OpCode::OVER, one, over).input(2).output(3));
    jump_table.register(Op::new(OpCode::PICK, one, pick).input(1).output(1));
    jump_table.register(
        Op::new(OpCode::ROLL, one, roll)
            .input(1)
            .output(1)
            .modify(-1),
    );
    jump_table.register(Op::new(OpCode::ROT, one, rot).input(3).output(3));
    jump_table.register(Op::new(OpCode::SWAP, one, swap).input(2).output(2));
    jump_table.register(Op::new(OpCode::TUCK, one, tuck).input(2).output(3));
}

/// Reads an index operand.
pub(crate) fn index_operand(item: &StackItem) -> VmResult<i64> {
    item.as_i64()
}

/// Vector position of the item `n` below the top.
fn position(context: &ExecutionContext, n: usize) -> usize {
    context.stack.len() - 1 - n
}

fn dup_from_alt_stack(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let item = args.args_alt[0].clone();
    Ok(OpOutput {
        context,
        results: vec![item.clone()],
        results_alt: vec![item],
    })
}

fn to_alt_stack(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    Ok(OpOutput {
        context,
        results: Vec::new(),
        results_alt: args.args,
    })
}

fn from_alt_stack(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    Ok(OpOutput::with_results(context, args.args_alt))
}

fn dup_from_alt_stack_bottom(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let item = context
        .stack_alt
        .first()
        .cloned()
        .ok_or(VmError::AltStackUnderflow)?;
    Ok(OpOutput::with_results(context, vec![item]))
}

fn is_null(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let result = StackItem::from_bool(args.args[0].is_null());
    Ok(OpOutput::with_results(context, vec![result]))
}

fn xdrop(
    _: &mut Machine<'_>,
    op: &Op,
    mut context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let n = index_operand(&args.args[0])?;
    if n < 0 {
        return Err(VmError::NegativeIndex("XDROP"));
    }
    let n = n as usize;
    if n >= context.stack.len() {
        return Err(VmError::stack_underflow(&*op.name, context.stack.len(), n + 1));
    }
    let index = position(&context, n);
    context.stack.remove(index);
    Ok(OpOutput::new(context))
}

fn xswap(
    _: &mut Machine<'_>,
    op: &Op,
    mut context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let n = index_operand(&args.args[0])?;
    if n < 0 {
        return Err(VmError::NegativeIndex("XSWAP"));
    }
    let n = n as usize;
    if n >= context.stack.len() {
        return Err(VmError::stack_underflow(&*op.name, context.stack.len(), n + 1));
    }
    let top = context.stack.len() - 1;
    let index = position(&context, n);
    context.stack.swap(top, index);
    Ok(OpOutput::new(context))
}

fn xtuck(
    _: &mut Machine<'_>,
    op: &Op,
    mut context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let n = index_operand(&args.args[0])?;
    if n <= 0 {
        return Err(VmError::NegativeIndex("XTUCK"));
    }
    let n = n as usize;
    let length = context.stack.len();
    if n > length {
        return Err(VmError::stack_underflow(&*op.name, length, n));
    }
    let top = context.stack[length - 1].clone();
    context.stack.insert(length - n, top);
    Ok(OpOutput::new(context))
}

fn depth(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, _: OpArgs) -> VmResult<OpOutput> {
    let depth = context.stack.len() as i64;
    Ok(OpOutput::with_results(context, vec![StackItem::from_int(depth)]))
}

fn drop(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, _: OpArgs) -> VmResult<OpOutput> {
    Ok(OpOutput::new(context))
}

fn dup(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    let top = args.args[0].clone();
    Ok(OpOutput::with_results(context, vec![top.clone(), top]))
}

fn nip(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    mut args: OpArgs,
) -> VmResult<OpOutput> {
    let top = args.args.swap_remove(0);
    Ok(OpOutput::with_results(context, vec![top]))
}

fn over(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let [a0, a1] = take::<2>(args)?;
    Ok(OpOutput::with_results(context, vec![a1.clone(), a0, a1]))
}

fn pick(
    _: &mut Machine<'_>,
    op: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let n = index_operand(&args.args[0])?;
    if n < 0 {
        return Err(VmError::NegativeIndex("PICK"));
    }
    let n = n as usize;
    if n >= context.stack.len() {
        return Err(VmError::stack_underflow(&*op.name, context.stack.len(), n + 1));
    }
    let item = context.stack[position(&context, n)].clone();
    Ok(OpOutput::with_results(context, vec![item]))
}

fn roll(
    _: &mut Machine<'_>,
    op: &Op,
    mut context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let n = index_operand(&args.args[0])?;
    if n < 0 {
        return Err(VmError::NegativeIndex("ROLL"));
    }
    let n = n as usize;
    if n >= context.stack.len() {
        return Err(VmError::stack_underflow(&*op.name, context.stack.len(), n + 1));
    }
    let index = position(&context, n);
    let item = context.stack.remove(index);
    Ok(OpOutput::with_results(context, vec![item]))
}

fn rot(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    let [a0, a1, a2] = take::<3>(args)?;
    Ok(OpOutput::with_results(context, vec![a2, a0, a1]))
}

fn swap(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let [a0, a1] = take::<2>(args)?;
    Ok(OpOutput::with_results(context, vec![a1, a0]))
}

fn tuck(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let [a0, a1] = take::<2>(args)?;
    Ok(OpOutput::with_results(context, vec![a0.clone(), a1, a0]))
}

/// Moves the popped inputs into a fixed-size array, top first.
pub(crate) fn take<const N: usize>(args: OpArgs) -> VmResult<[StackItem; N]> {
    let length = args.args.len();
    <[StackItem; N]>::try_from(args.args)
        .map_err(|_| VmError::stack_underflow("args", length, N))
}
