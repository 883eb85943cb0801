//! Compound type operations for the Neo Virtual Machine.
//!
//! Arrays and maps are mutated in place, so every holder of the container observes the
//! change. Structs are copied whenever they are stored into a container.

use std::rc::Rc;

use neo_config::FeeSchedule;

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::jump_table::stack::index_operand;
use crate::jump_table::JumpTable;
use crate::op::{Op, OpArgs, OpOutput, Operand};
use crate::op_code::OpCode;
use crate::stack_item::StackItem;

/// Registers the compound type operation handlers.
pub fn register_handlers(jump_table: &mut JumpTable, fees: &FeeSchedule) {
    let one = fees.one;
    jump_table.register(Op::new(OpCode::ARRAYSIZE, one, array_size).input(1).output(1));
    jump_table.register_dynamic(OpCode::PACK, build_pack);
    jump_table.register_dynamic(OpCode::UNPACK, build_unpack);
    jump_table.register(Op::new(OpCode::PICKITEM, one, pick_item).input(2).output(1));
    jump_table.register(Op::new(OpCode::SETITEM, one, set_item).input(3));
    jump_table.register(Op::new(OpCode::NEWARRAY, one, new_array).input(1).output(1));
    jump_table.register(Op::new(OpCode::NEWSTRUCT, one, new_array).input(1).output(1));
    jump_table.register(Op::new(OpCode::NEWMAP, one, new_map).output(1));
    jump_table.register(Op::new(OpCode::APPEND, one, append).input(2));
    jump_table.register(Op::new(OpCode::REVERSE, one, reverse).input(1));
    jump_table.register(Op::new(OpCode::REMOVE, one, remove).input(2));
    jump_table.register(Op::new(OpCode::HASKEY, one, has_key).input(2).output(1));
    jump_table.register(Op::new(OpCode::KEYS, one, keys).input(1).output(1));
    jump_table.register(Op::new(OpCode::VALUES, one, values).input(1).output(1));
}

/// Element count of a container, or byte length of a primitive.
fn array_size(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let size = match &args.args[0] {
        StackItem::Array(items) | StackItem::Struct(items) => items.borrow().len(),
        StackItem::Map(map) => map.borrow().len(),
        other => other.as_buffer()?.len(),
    };
    Ok(OpOutput::with_results(context, vec![StackItem::from_int(size as i64)]))
}

/// `PACK`: the count on top decides how many items are consumed.
fn build_pack(machine: &Machine<'_>, context: &mut ExecutionContext) -> VmResult<Op> {
    let count = match context.peek(0) {
        None => 0,
        Some(top) => {
            let count = top.as_i64()?;
            if count < 0 {
                return Err(VmError::InvalidPackCount);
            }
            let count = count as usize;
            if count > machine.limits().max_array_size {
                return Err(VmError::ContainerTooLarge);
            }
            count
        }
    };
    Ok(Op::new(OpCode::PACK, machine.fees().one, pack)
        .input(count + 1)
        .output(1)
        .array(count)
        .operand(Operand::Count(count)))
}

/// The item below the count becomes the first element.
fn pack(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    mut args: OpArgs,
) -> VmResult<OpOutput> {
    let items = args.args.split_off(1);
    Ok(OpOutput::with_results(context, vec![StackItem::new_array(items)]))
}

/// `UNPACK`: pushes the elements of the array on top, then their count.
fn build_unpack(machine: &Machine<'_>, context: &mut ExecutionContext) -> VmResult<Op> {
    let length = match context.peek(0) {
        None => 0,
        Some(top) => top.as_array_ref()?.borrow().len(),
    };
    Ok(Op::new(OpCode::UNPACK, machine.fees().one, unpack)
        .input(1)
        .output(length + 1))
}

fn unpack(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let items = args.args[0].as_array()?;
    let mut results = Vec::with_capacity(items.len() + 1);
    results.push(StackItem::from_int(items.len() as i64));
    results.extend(items);
    Ok(OpOutput::with_results(context, results))
}

/// Validated array position of an index operand.
fn array_index(key: &StackItem, length: usize) -> VmResult<Option<usize>> {
    let index = index_operand(key)?;
    Ok(usize::try_from(index).ok().filter(|index| *index < length))
}

fn pick_item(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let key = &args.args[0];
    let item = match &args.args[1] {
        StackItem::Array(items) | StackItem::Struct(items) => {
            let items = items.borrow();
            let index = array_index(key, items.len())?
                .ok_or_else(|| VmError::InvalidPickItemKey(format!("{:?}", key)))?;
            items[index].clone()
        }
        StackItem::Map(map) => map
            .borrow()
            .get(key)?
            .ok_or_else(|| VmError::InvalidPickItemKey(format!("{:?}", key)))?,
        other => return Err(VmError::conversion(other.type_name(), "Map")),
    };
    Ok(OpOutput::with_results(context, vec![item]))
}

fn set_item(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let value = args.args[0].copy_if_struct();
    let key = &args.args[1];
    match &args.args[2] {
        StackItem::Array(items) | StackItem::Struct(items) => {
            let mut items = items.borrow_mut();
            let index = array_index(key, items.len())?.ok_or(VmError::InvalidSetItemIndex)?;
            items[index] = value;
        }
        StackItem::Map(map) => {
            let mut map = map.borrow_mut();
            if !map.contains_key(key)? && map.len() >= machine.limits().max_array_size {
                return Err(VmError::ContainerTooLarge);
            }
            map.insert(key.clone(), value)?;
        }
        other => return Err(VmError::conversion(other.type_name(), "Map")),
    }
    Ok(OpOutput::new(context))
}

/// `NEWARRAY` and `NEWSTRUCT`: converts an array or struct, or creates `count` false
/// elements.
fn new_array(
    machine: &mut Machine<'_>,
    op: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let is_struct = op.opcode == OpCode::NEWSTRUCT as u8;
    let result = match &args.args[0] {
        StackItem::Array(items) | StackItem::Struct(items) => {
            if is_struct {
                StackItem::Struct(Rc::clone(items))
            } else {
                StackItem::Array(Rc::clone(items))
            }
        }
        other => {
            let count = index_operand(other)?.max(0) as usize;
            if count > machine.limits().max_array_size {
                return Err(VmError::ContainerTooLarge);
            }
            let items = vec![StackItem::from_bool(false); count];
            if is_struct {
                StackItem::new_struct(items)
            } else {
                StackItem::new_array(items)
            }
        }
    };
    Ok(OpOutput::with_results(context, vec![result]))
}

fn new_map(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    Ok(OpOutput::with_results(context, vec![StackItem::new_map()]))
}

fn append(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let value = args.args[0].copy_if_struct();
    let items = args.args[1].as_array_ref()?;
    let mut items = items.borrow_mut();
    if items.len() >= machine.limits().max_array_size {
        return Err(VmError::ContainerTooLarge);
    }
    items.push(value);
    Ok(OpOutput::new(context))
}

fn reverse(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    args.args[0].as_array_ref()?.borrow_mut().reverse();
    Ok(OpOutput::new(context))
}

fn remove(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let key = &args.args[0];
    match &args.args[1] {
        StackItem::Array(items) | StackItem::Struct(items) => {
            let mut items = items.borrow_mut();
            let index = array_index(key, items.len())?
                .ok_or_else(|| VmError::InvalidRemoveIndex(format!("{:?}", key)))?;
            items.remove(index);
        }
        StackItem::Map(map) => {
            map.borrow_mut().remove(key)?;
        }
        other => return Err(VmError::conversion(other.type_name(), "Map")),
    }
    Ok(OpOutput::new(context))
}

fn has_key(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let key = &args.args[0];
    let result = match &args.args[1] {
        StackItem::Array(items) | StackItem::Struct(items) => {
            let index = index_operand(key)?;
            if index < 0 {
                return Err(VmError::InvalidHasKeyIndex);
            }
            (index as usize) < items.borrow().len()
        }
        StackItem::Map(map) => map.borrow().contains_key(key)?,
        other => return Err(VmError::conversion(other.type_name(), "Map")),
    };
    Ok(OpOutput::with_results(context, vec![StackItem::from_bool(result)]))
}

fn keys(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let keys = args.args[0].as_map()?.borrow().keys();
    Ok(OpOutput::with_results(context, vec![StackItem::new_array(keys)]))
}

fn values(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let values = match &args.args[0] {
        StackItem::Map(map) => map.borrow().values(),
        other => other.as_array()?,
    };
    let values = values.iter().map(StackItem::copy_if_struct).collect();
    Ok(OpOutput::with_results(context, vec![StackItem::new_array(values)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_index_bounds() {
        assert_eq!(array_index(&StackItem::from_int(0), 2).unwrap(), Some(0));
        assert_eq!(array_index(&StackItem::from_int(2), 2).unwrap(), None);
        assert_eq!(array_index(&StackItem::from_int(-1), 2).unwrap(), None);
        assert!(array_index(&StackItem::new_map(), 2).is_err());
    }
}
