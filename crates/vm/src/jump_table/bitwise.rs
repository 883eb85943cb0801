//! Bitwise operations for the Neo Virtual Machine.
//!
//! Integer operands are combined byte by byte on their two's complement encodings, with
//! the shorter operand sign-extended to the length of the longer one.

use neo_config::FeeSchedule;
use num_bigint::BigInt;

use crate::error::VmResult;
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::jump_table::JumpTable;
use crate::op::{Op, OpArgs, OpOutput};
use crate::op_code::OpCode;
use crate::stack_item::StackItem;

/// Registers the bitwise operation handlers.
pub fn register_handlers(jump_table: &mut JumpTable, fees: &FeeSchedule) {
    jump_table.register(Op::new(OpCode::INVERT, fees.one, invert).input(1).output(1));
    jump_table.register(Op::new(OpCode::AND, fees.one, and).input(2).output(1));
    jump_table.register(Op::new(OpCode::OR, fees.one, or).input(2).output(1));
    jump_table.register(Op::new(OpCode::XOR, fees.one, xor).input(2).output(1));
    jump_table.register(Op::new(OpCode::EQUAL, fees.one, equal).input(2).output(1));
}

/// Little-endian two's complement bytes of `value`, sign-extended to `length`.
fn sign_extended(value: &BigInt, length: usize) -> Vec<u8> {
    let mut bytes = value.to_signed_bytes_le();
    let fill = if bytes.last().map_or(false, |b| b & 0x80 != 0) {
        0xff
    } else {
        0x00
    };
    bytes.resize(length.max(bytes.len()), fill);
    bytes
}

/// Applies `f` to each byte pair of the equal-length encodings of `a` and `b`.
pub(crate) fn bitwise_op(a: &BigInt, b: &BigInt, f: impl Fn(u8, u8) -> u8) -> BigInt {
    let length = a.to_signed_bytes_le().len().max(b.to_signed_bytes_le().len());
    let a = sign_extended(a, length);
    let b = sign_extended(b, length);
    let bytes: Vec<u8> = a.iter().zip(b.iter()).map(|(x, y)| f(*x, *y)).collect();
    BigInt::from_signed_bytes_le(&bytes)
}

pub(crate) fn invert_value(value: &BigInt) -> BigInt {
    let bytes: Vec<u8> = value.to_signed_bytes_le().iter().map(|b| !b).collect();
    BigInt::from_signed_bytes_le(&bytes)
}

fn invert(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let value = args.args[0].as_big_integer()?;
    Ok(OpOutput::with_results(
        context,
        vec![StackItem::Integer(invert_value(&value))],
    ))
}

fn binary(context: ExecutionContext, args: &OpArgs, f: fn(u8, u8) -> u8) -> VmResult<OpOutput> {
    let a = args.args[0].as_big_integer()?;
    let b = args.args[1].as_big_integer()?;
    Ok(OpOutput::with_results(
        context,
        vec![StackItem::Integer(bitwise_op(&a, &b, f))],
    ))
}

fn and(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    binary(context, &args, |a, b| a & b)
}

fn or(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    binary(context, &args, |a, b| a | b)
}

fn xor(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, args: OpArgs) -> VmResult<OpOutput> {
    binary(context, &args, |a, b| a ^ b)
}

fn equal(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let result = args.args[0].equals(&args.args[1]);
    Ok(OpOutput::with_results(context, vec![StackItem::from_bool(result)]))
}
