//! Numeric operations for the Neo Virtual Machine.
//!
//! Binary operators read the second item as the left operand and the top item as the
//! right operand. Integer results wider than 32 bytes fault.

use std::cmp::Ordering;

use neo_config::FeeSchedule;
use num_bigint::{BigInt, Sign};
use num_traits::{Signed, Zero};

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::jump_table::JumpTable;
use crate::op::{Op, OpArgs, OpInvoke, OpOutput};
use crate::op_code::OpCode;
use crate::stack_item::{StackItem, MAX_BIG_INTEGER_SIZE};

/// Registers the numeric operation handlers.
pub fn register_handlers(jump_table: &mut JumpTable, fees: &FeeSchedule) {
    let unary: [(OpCode, OpInvoke); 7] = [
        (OpCode::INC, inc),
        (OpCode::DEC, dec),
        (OpCode::SIGN, sign),
        (OpCode::NEGATE, negate),
        (OpCode::ABS, abs),
        (OpCode::NOT, not),
        (OpCode::NZ, nz),
    ];
    for (opcode, invoke) in unary {
        jump_table.register(Op::new(opcode, fees.one, invoke).input(1).output(1));
    }

    let binary: [(OpCode, OpInvoke); 17] = [
        (OpCode::ADD, add),
        (OpCode::SUB, sub),
        (OpCode::MUL, mul),
        (OpCode::DIV, div),
        (OpCode::MOD, modulo),
        (OpCode::SHL, shl),
        (OpCode::SHR, shr),
        (OpCode::BOOLAND, bool_and),
        (OpCode::BOOLOR, bool_or),
        (OpCode::NUMEQUAL, compare),
        (OpCode::NUMNOTEQUAL, compare),
        (OpCode::LT, compare),
        (OpCode::GT, compare),
        (OpCode::LTE, compare),
        (OpCode::GTE, compare),
        (OpCode::MIN, min),
        (OpCode::MAX, max),
    ];
    for (opcode, invoke) in binary {
        jump_table.register(Op::new(opcode, fees.one, invoke).input(2).output(1));
    }

    jump_table.register(Op::new(OpCode::WITHIN, fees.one, within).input(3).output(1));
}

/// Fails when an integer result does not fit the engine's integer width.
fn checked(value: BigInt) -> VmResult<StackItem> {
    if value.to_signed_bytes_le().len() > MAX_BIG_INTEGER_SIZE {
        return Err(VmError::NumberTooLarge(value.to_string()));
    }
    Ok(StackItem::Integer(value))
}

fn integer_output(context: ExecutionContext, value: BigInt) -> VmResult<OpOutput> {
    Ok(OpOutput::with_results(context, vec![checked(value)?]))
}

fn boolean_output(context: ExecutionContext, value: bool) -> VmResult<OpOutput> {
    Ok(OpOutput::with_results(context, vec![StackItem::from_bool(value)]))
}

/// Left and right operands of a binary operator.
fn operands(args: &OpArgs) -> VmResult<(BigInt, BigInt)> {
    Ok((args.args[1].as_big_integer()?, args.args[0].as_big_integer()?))
}

fn inc(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    integer_output(context, args.args[0].as_big_integer()? + 1)
}

fn dec(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    integer_output(context, args.args[0].as_big_integer()? - 1)
}

fn sign(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let value = match args.args[0].as_big_integer()?.sign() {
        Sign::Minus => -1,
        Sign::NoSign => 0,
        Sign::Plus => 1,
    };
    integer_output(context, BigInt::from(value))
}

fn negate(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    integer_output(context, -args.args[0].as_big_integer()?)
}

fn abs(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    integer_output(context, args.args[0].as_big_integer()?.abs())
}

fn not(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    boolean_output(context, !args.args[0].as_boolean())
}

fn nz(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    boolean_output(context, !args.args[0].as_big_integer()?.is_zero())
}

fn add(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    let (a, b) = operands(&args)?;
    integer_output(context, a + b)
}

fn sub(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    let (a, b) = operands(&args)?;
    integer_output(context, a - b)
}

fn mul(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    let (a, b) = operands(&args)?;
    integer_output(context, a * b)
}

/// Quotient truncated toward zero.
fn div(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    let (a, b) = operands(&args)?;
    if b.is_zero() {
        return Err(VmError::DivideByZero);
    }
    integer_output(context, a / b)
}

/// Remainder with the sign of the dividend.
fn modulo(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let (a, b) = operands(&args)?;
    if b.is_zero() {
        return Err(VmError::DivideByZero);
    }
    integer_output(context, a % b)
}

/// Shifts left by `shift` bits, or right when `shift` is negative.
pub(crate) fn shift_left(value: &BigInt, shift: i64) -> BigInt {
    let bits = shift.unsigned_abs() as usize;
    if shift >= 0 {
        value << bits
    } else {
        value >> bits
    }
}

fn shift_operands(machine: &Machine<'_>, args: &OpArgs) -> VmResult<(BigInt, i64)> {
    let shift = args.args[0].as_big_integer()?;
    let max = machine.limits().max_shl_shr;
    match i64::try_from(&shift) {
        Ok(bits) if (-max..=max).contains(&bits) => Ok((args.args[1].as_big_integer()?, bits)),
        _ => Err(VmError::ShiftTooLarge(shift.to_string())),
    }
}

fn shl(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let (value, shift) = shift_operands(machine, &args)?;
    integer_output(context, shift_left(&value, shift))
}

fn shr(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let (value, shift) = shift_operands(machine, &args)?;
    integer_output(context, shift_left(&value, -shift))
}

fn bool_and(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    boolean_output(context, args.args[0].as_boolean() && args.args[1].as_boolean())
}

fn bool_or(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    boolean_output(context, args.args[0].as_boolean() || args.args[1].as_boolean())
}

/// Numeric comparisons of the second item against the top item.
fn compare(
    _: &mut Machine<'_>,
    op: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let (a, b) = operands(&args)?;
    let ordering = a.cmp(&b);
    let result = match OpCode::from_u8(op.opcode) {
        Some(OpCode::NUMEQUAL) => ordering == Ordering::Equal,
        Some(OpCode::NUMNOTEQUAL) => ordering != Ordering::Equal,
        Some(OpCode::LT) => ordering == Ordering::Less,
        Some(OpCode::GT) => ordering == Ordering::Greater,
        Some(OpCode::LTE) => ordering != Ordering::Greater,
        Some(OpCode::GTE) => ordering != Ordering::Less,
        _ => return Err(VmError::UnknownOp(op.opcode)),
    };
    boolean_output(context, result)
}

fn min(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    let (a, b) = operands(&args)?;
    integer_output(context, a.min(b))
}

fn max(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    let (a, b) = operands(&args)?;
    integer_output(context, a.max(b))
}

/// `WITHIN x a b`: true when `a <= x < b`.
fn within(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let upper = args.args[0].as_big_integer()?;
    let lower = args.args[1].as_big_integer()?;
    let value = args.args[2].as_big_integer()?;
    boolean_output(context, lower <= value && value < upper)
}
