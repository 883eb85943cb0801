//! Binary stack item format used by `Runtime.Serialize` and `Runtime.Deserialize`.
//!
//! Each item is a type tag followed by its payload: var-bytes for byte arrays and
//! integers, a single byte for booleans, and a var-int element count for containers.

use std::collections::HashSet;

use neo_config::VmLimits;
use neo_io::{BinaryWriter, MemoryReader};
use num_bigint::BigInt;

use crate::error::{VmError, VmResult};
use crate::stack_item::{bigint_to_bytes, StackItem, MAX_BIG_INTEGER_SIZE};

/// Type tags of the serialization format.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackItemType {
    ByteArray = 0x00,
    Boolean = 0x01,
    Integer = 0x02,
    Array = 0x80,
    Struct = 0x81,
    Map = 0x82,
}

impl StackItemType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::ByteArray),
            0x01 => Some(Self::Boolean),
            0x02 => Some(Self::Integer),
            0x80 => Some(Self::Array),
            0x81 => Some(Self::Struct),
            0x82 => Some(Self::Map),
            _ => None,
        }
    }
}

/// Serializes an item. Containers may appear only once in the graph.
pub fn serialize(item: &StackItem, max_size: usize) -> VmResult<Vec<u8>> {
    let mut writer = BinaryWriter::new();
    let mut seen = HashSet::new();
    let mut pending = vec![item.clone()];

    while let Some(item) = pending.pop() {
        if let Some(id) = item.container_id() {
            if !seen.insert(id) {
                return Err(VmError::CircularReference);
            }
        }
        match &item {
            StackItem::Boolean(value) => {
                writer.write_u8(StackItemType::Boolean as u8);
                writer.write_bool(*value);
            }
            StackItem::Integer(value) => {
                writer.write_u8(StackItemType::Integer as u8);
                writer.write_var_bytes(&bigint_to_bytes(value));
            }
            StackItem::Buffer(_)
            | StackItem::UInt160(_)
            | StackItem::UInt256(_)
            | StackItem::ECPoint(_) => {
                writer.write_u8(StackItemType::ByteArray as u8);
                writer.write_var_bytes(&item.as_buffer()?);
            }
            StackItem::Array(items) | StackItem::Struct(items) => {
                let tag = if matches!(item, StackItem::Struct(_)) {
                    StackItemType::Struct
                } else {
                    StackItemType::Array
                };
                let items = items.borrow();
                writer.write_u8(tag as u8);
                writer.write_var_int(items.len() as u64);
                pending.extend(items.iter().rev().cloned());
            }
            StackItem::Map(map) => {
                let entries = map.borrow().entries();
                writer.write_u8(StackItemType::Map as u8);
                writer.write_var_int(entries.len() as u64);
                for (key, value) in entries.into_iter().rev() {
                    pending.push(value);
                    pending.push(key);
                }
            }
            other => return Err(VmError::conversion(other.type_name(), "serialized bytes")),
        }
        if writer.len() > max_size {
            return Err(VmError::ItemTooLarge);
        }
    }

    Ok(writer.into_bytes())
}

enum Pending {
    Item(StackItem),
    Container { tag: StackItemType, count: usize },
}

/// Deserializes an item, bounding element counts by the array limit.
pub fn deserialize(data: &[u8], limits: &VmLimits) -> VmResult<StackItem> {
    let mut reader = MemoryReader::new(data);
    let mut pending = Vec::new();
    let mut remaining: usize = 1;

    while remaining > 0 {
        remaining -= 1;
        let byte = reader.read_u8()?;
        let tag = StackItemType::from_u8(byte)
            .ok_or_else(|| VmError::InvalidFormat(format!("unknown type tag {byte:#04x}")))?;
        match tag {
            StackItemType::ByteArray => {
                let value = reader.read_var_bytes(limits.max_item_size)?;
                pending.push(Pending::Item(StackItem::from(value)));
            }
            StackItemType::Boolean => {
                pending.push(Pending::Item(StackItem::Boolean(reader.read_bool()?)));
            }
            StackItemType::Integer => {
                let value = reader.read_var_bytes(MAX_BIG_INTEGER_SIZE)?;
                pending.push(Pending::Item(StackItem::Integer(
                    BigInt::from_signed_bytes_le(&value),
                )));
            }
            StackItemType::Array | StackItemType::Struct | StackItemType::Map => {
                let count = reader.read_var_int(limits.max_array_size as u64)? as usize;
                pending.push(Pending::Container { tag, count });
                let children = if tag == StackItemType::Map {
                    count * 2
                } else {
                    count
                };
                remaining = remaining.saturating_add(children);
                if pending.len().saturating_add(remaining) > limits.max_stack_size {
                    return Err(VmError::StackOverflow);
                }
            }
        }
    }

    let mut built: Vec<StackItem> = Vec::new();
    let missing = || VmError::InvalidFormat("truncated container".to_string());
    while let Some(entry) = pending.pop() {
        match entry {
            Pending::Item(item) => built.push(item),
            Pending::Container { tag, count } => {
                let item = match tag {
                    StackItemType::Map => {
                        let map = StackItem::new_map();
                        {
                            let map = map.as_map()?;
                            let mut map = map.borrow_mut();
                            for _ in 0..count {
                                let key = built.pop().ok_or_else(missing)?;
                                let value = built.pop().ok_or_else(missing)?;
                                map.insert(key, value)?;
                            }
                        }
                        map
                    }
                    _ => {
                        let mut items = Vec::with_capacity(count);
                        for _ in 0..count {
                            items.push(built.pop().ok_or_else(missing)?);
                        }
                        if tag == StackItemType::Struct {
                            StackItem::new_struct(items)
                        } else {
                            StackItem::new_array(items)
                        }
                    }
                };
                built.push(item);
            }
        }
    }

    built.pop().ok_or_else(missing)
}
