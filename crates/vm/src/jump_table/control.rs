//! Control flow operations for the Neo Virtual Machine.
//!
//! Calls run the callee to completion as a nested execution that borrows the caller's
//! gas and, except for the isolated `CALL_*` family, its stacks.

use std::rc::Rc;

use neo_config::FeeSchedule;
use neo_core::UInt160;
use neo_io::MemoryReader;

use crate::error::{VmError, VmResult};
use crate::execution_context::{ExecutionContext, ScriptOptions};
use crate::execution_engine::Machine;
use crate::jump_table::JumpTable;
use crate::op::{Op, OpArgs, OpOutput, Operand};
use crate::op_code::OpCode;
use crate::stack_item::StackItem;
use crate::syscall;
use crate::vm_state::VMState;

/// Registers the control flow handlers.
pub fn register_handlers(jump_table: &mut JumpTable, fees: &FeeSchedule) {
    jump_table.register(Op::new(OpCode::NOP, fees.push, nop));
    jump_table.register(Op::new(OpCode::JMP, fees.one, jmp));
    jump_table.register(Op::new(OpCode::JMPIF, fees.one, jmp).input(1));
    jump_table.register(Op::new(OpCode::JMPIFNOT, fees.one, jmp).input(1));
    jump_table.register(Op::new(OpCode::CALL, fees.one, call).invocation(1));
    jump_table.register(Op::new(OpCode::RET, fees.one, ret));
    jump_table.register_dynamic(OpCode::APPCALL, build_app_call);
    jump_table.register_dynamic(OpCode::SYSCALL, syscall::build_syscall);
    jump_table.register_dynamic(OpCode::TAILCALL, build_tail_call);
    jump_table.register_dynamic(OpCode::CALL_I, build_call_i);
    jump_table.register_dynamic(OpCode::CALL_E, build_call_e);
    jump_table.register_dynamic(OpCode::CALL_ED, build_call_ed);
    jump_table.register_dynamic(OpCode::CALL_ET, build_call_et);
    jump_table.register_dynamic(OpCode::CALL_EDT, build_call_edt);
    jump_table.register(Op::new(OpCode::THROW, fees.one, throw));
    jump_table.register(Op::new(OpCode::THROWIFNOT, fees.one, throw_if_not).input(1));
}

fn nop(_: &mut Machine<'_>, _: &Op, context: ExecutionContext, _: OpArgs) -> VmResult<OpOutput> {
    Ok(OpOutput::new(context))
}

/// Target of the jump whose `i16` offset is at `pc`, relative to the opcode.
fn jump_target(context: &ExecutionContext) -> VmResult<usize> {
    let offset = MemoryReader::with_position(&context.code, context.pc)
        .read_i16()
        .map_err(|_| VmError::CodeOverflow)?;
    let target = context.pc as i64 + 2 + i64::from(offset) - 3;
    if target < 0 || target > context.code.len() as i64 {
        return Err(VmError::CodeOverflow);
    }
    Ok(target as usize)
}

fn jmp(
    _: &mut Machine<'_>,
    op: &Op,
    mut context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let target = jump_target(&context)?;
    let jump = match OpCode::from_u8(op.opcode) {
        Some(OpCode::JMPIF) => args.args[0].as_boolean(),
        Some(OpCode::JMPIFNOT) => !args.args[0].as_boolean(),
        _ => true,
    };
    context.pc = if jump { target } else { context.pc + 2 };
    Ok(OpOutput::new(context))
}

/// Runs the jump target as a nested execution sharing this context's stacks. The
/// subroutine sees the running script as its caller.
fn call(
    machine: &mut Machine<'_>,
    _: &Op,
    mut context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    let target = jump_target(&context)?;
    let stack = std::mem::take(&mut context.stack);
    let stack_alt = std::mem::take(&mut context.stack_alt);
    let depth = context.depth + 1;
    let rvcount = context.rvcount;
    let mut callee = context.isolated(target, depth, stack, rvcount);
    callee.stack_alt = stack_alt;
    callee.calling_script_hash = Some(context.script_hash);

    let callee = machine.run(callee);
    let faulted = callee.state.is_fault();
    let message = callee.error_message.clone();
    context.resume_from(callee);
    if faulted {
        return Ok(OpOutput::new(context.fault(message.unwrap_or_default())));
    }
    context.pc += 2;
    Ok(OpOutput::new(context))
}

fn ret(
    _: &mut Machine<'_>,
    _: &Op,
    mut context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    context.state = VMState::HALT;
    Ok(OpOutput::new(context))
}

fn read_hash(context: &ExecutionContext, position: usize) -> VmResult<UInt160> {
    MemoryReader::with_position(&context.code, position)
        .read_array::<20>()
        .map(UInt160)
        .map_err(|_| VmError::CodeOverflow)
}

fn build_app_call(machine: &Machine<'_>, context: &mut ExecutionContext) -> VmResult<Op> {
    app_call_op(machine, context, OpCode::APPCALL, false)
}

fn build_tail_call(machine: &Machine<'_>, context: &mut ExecutionContext) -> VmResult<Op> {
    app_call_op(machine, context, OpCode::TAILCALL, true)
}

fn app_call_op(
    machine: &Machine<'_>,
    context: &mut ExecutionContext,
    opcode: OpCode,
    tail: bool,
) -> VmResult<Op> {
    let hash = read_hash(context, context.pc)?;
    context.pc += UInt160::LENGTH;
    let dynamic = hash.is_zero();
    Ok(Op::new(opcode, machine.fees().ten, app_call)
        .input(usize::from(dynamic))
        .invocation(usize::from(!tail))
        .operand(Operand::AppCall {
            hash: (!dynamic).then_some(hash),
            tail,
        }))
}

/// Fails unless the executing contract may call contracts chosen at runtime.
fn check_dynamic_invoke(machine: &Machine<'_>, context: &ExecutionContext) -> VmResult<()> {
    let allowed = machine
        .blockchain
        .try_get_contract(&context.script_hash)
        .map_or(false, |contract| contract.has_dynamic_invoke());
    if allowed {
        Ok(())
    } else {
        Err(VmError::ContractNoDynamicInvoke(context.script_hash))
    }
}

/// Code of a native or deployed contract.
fn load_script(machine: &Machine<'_>, hash: &UInt160) -> VmResult<Rc<[u8]>> {
    if let Some(native) = machine.engine.natives().get_by_hash(hash) {
        return Ok(Rc::from(native.script()));
    }
    Ok(Rc::from(machine.blockchain.get_contract(hash)?.script))
}

fn app_call(
    machine: &mut Machine<'_>,
    op: &Op,
    mut context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let Operand::AppCall { hash, tail } = op.operand else {
        return Err(VmError::UnknownOp(op.opcode));
    };
    let hash = match hash {
        Some(hash) => hash,
        None => {
            check_dynamic_invoke(machine, &context)?;
            args.args[0].as_uint160()?
        }
    };
    let code = load_script(machine, &hash)?;
    let depth = if tail { context.depth } else { context.depth + 1 };
    let options = context.callee_options(depth);
    let callee = machine.execute_script(code, false, options);

    let state = callee.state;
    let message = callee.error_message.clone();
    context.resume_from(callee);
    if state.is_fault() {
        return Ok(OpOutput::new(context.fault(message.unwrap_or_default())));
    }
    if tail {
        context.state = VMState::HALT;
    }
    Ok(OpOutput::new(context))
}

/// `CALL_I rvcount pcount offset`: runs an offset of this script on the top `pcount`
/// items and returns its top `rvcount` results.
fn build_call_i(machine: &Machine<'_>, context: &mut ExecutionContext) -> VmResult<Op> {
    let mut reader = MemoryReader::with_position(&context.code, context.pc);
    let rvcount = reader.read_u8().map_err(|_| VmError::CodeOverflow)?;
    let pcount = reader.read_u8().map_err(|_| VmError::CodeOverflow)?;
    let offset = reader.read_i16().map_err(|_| VmError::CodeOverflow)?;
    let target = context.pc as i64 - 1 + i64::from(offset);
    if target < 0 || target > context.code.len() as i64 {
        return Err(VmError::CodeOverflow);
    }
    context.pc += 4;
    Ok(Op::new(OpCode::CALL_I, machine.fees().one, call_i)
        .input(pcount as usize)
        .output(rvcount as usize)
        .invocation(1)
        .operand(Operand::CallI {
            rvcount,
            pcount,
            target: target as usize,
        }))
}

/// Top `rvcount` items of a finished callee, bottom first.
fn returned_values(callee: &ExecutionContext, rvcount: u8) -> VmResult<Vec<StackItem>> {
    let count = rvcount as usize;
    let found = callee.stack.len();
    if found < count {
        return Err(VmError::InsufficientReturnValue {
            found,
            expected: count,
        });
    }
    Ok(callee.stack[found - count..].to_vec())
}

fn call_i(
    machine: &mut Machine<'_>,
    op: &Op,
    mut context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let Operand::CallI {
        rvcount, target, ..
    } = op.operand
    else {
        return Err(VmError::UnknownOp(op.opcode));
    };
    let params = args.args.into_iter().rev().collect();
    let depth = context.depth + 1;
    let callee = context.isolated(target, depth, params, i32::from(rvcount));

    let mut callee = machine.run(callee);
    context.take_shared_state(&mut callee);
    if callee.state.is_fault() {
        let message = callee.error_message.unwrap_or_default();
        return Ok(OpOutput::new(context.fault(message)));
    }
    let mut results = returned_values(&callee, rvcount)?;
    results.reverse();
    Ok(OpOutput::with_results(context, results))
}

fn build_call_e(machine: &Machine<'_>, context: &mut ExecutionContext) -> VmResult<Op> {
    call_e_op(machine, context, OpCode::CALL_E, false, false)
}

fn build_call_ed(machine: &Machine<'_>, context: &mut ExecutionContext) -> VmResult<Op> {
    call_e_op(machine, context, OpCode::CALL_ED, true, false)
}

fn build_call_et(machine: &Machine<'_>, context: &mut ExecutionContext) -> VmResult<Op> {
    call_e_op(machine, context, OpCode::CALL_ET, false, true)
}

fn build_call_edt(machine: &Machine<'_>, context: &mut ExecutionContext) -> VmResult<Op> {
    call_e_op(machine, context, OpCode::CALL_EDT, true, true)
}

/// `CALL_E rvcount pcount [hash]`: calls a contract on the top `pcount` items.
fn call_e_op(
    machine: &Machine<'_>,
    context: &mut ExecutionContext,
    opcode: OpCode,
    dynamic: bool,
    tail: bool,
) -> VmResult<Op> {
    let mut reader = MemoryReader::with_position(&context.code, context.pc);
    let rvcount = reader.read_u8().map_err(|_| VmError::CodeOverflow)?;
    let pcount = reader.read_u8().map_err(|_| VmError::CodeOverflow)?;
    let hash = if dynamic {
        None
    } else {
        Some(read_hash(context, context.pc + 2)?)
    };
    context.pc += if dynamic { 2 } else { 2 + UInt160::LENGTH };

    Ok(Op::new(opcode, machine.fees().ten, call_e)
        .input(pcount as usize + usize::from(dynamic))
        .output(if tail { 0 } else { rvcount as usize })
        .invocation(usize::from(!tail))
        .operand(Operand::CallE {
            rvcount,
            pcount,
            hash,
            tail,
        }))
}

fn call_e(
    machine: &mut Machine<'_>,
    op: &Op,
    mut context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let Operand::CallE {
        rvcount,
        hash,
        tail,
        ..
    } = op.operand
    else {
        return Err(VmError::UnknownOp(op.opcode));
    };
    if tail && context.rvcount != i32::from(rvcount) {
        return Err(VmError::InvalidTailCall {
            found: i32::from(rvcount),
            expected: context.rvcount,
        });
    }

    let mut params = args.args;
    let hash = match hash {
        Some(hash) => hash,
        None => {
            check_dynamic_invoke(machine, &context)?;
            params.remove(0).as_uint160()?
        }
    };
    let code = load_script(machine, &hash)?;
    params.reverse();

    let options = ScriptOptions {
        depth: if tail { context.depth } else { context.depth + 1 },
        calling_script_hash: Some(context.script_hash),
        entry_script_hash: context.entry_script_hash,
        stack: params,
        stack_alt: Vec::new(),
        gas_left: context.gas_left,
        created_contracts: std::mem::take(&mut context.created_contracts),
        action_index: context.action_index,
        rvcount: i32::from(rvcount),
    };
    let mut callee = machine.execute_script(code, false, options);
    context.take_shared_state(&mut callee);
    if callee.state.is_fault() {
        let message = callee.error_message.unwrap_or_default();
        return Ok(OpOutput::new(context.fault(message)));
    }

    let returned = returned_values(&callee, rvcount)?;
    if tail {
        context.stack = returned;
        context.state = VMState::HALT;
        return Ok(OpOutput::new(context));
    }
    let results = returned.into_iter().rev().collect();
    Ok(OpOutput::with_results(context, results))
}

fn throw(_: &mut Machine<'_>, _: &Op, _: ExecutionContext, _: OpArgs) -> VmResult<OpOutput> {
    Err(VmError::Throw)
}

fn throw_if_not(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    if !args.args[0].as_boolean() {
        return Err(VmError::Throw);
    }
    Ok(OpOutput::new(context))
}
