//! Conversion of result stacks into contract parameters.

use std::collections::HashSet;

use neo_core::{UInt160, UInt256};
use neo_cryptography::ECPoint;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::stack_item::StackItem;

/// A typed, self-contained value reported to callers and listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ContractParameter {
    Boolean(bool),
    Integer(BigInt),
    ByteArray(Vec<u8>),
    Hash160(UInt160),
    Hash256(UInt256),
    PublicKey(ECPoint),
    String(String),
    Array(Vec<ContractParameter>),
    Map(Vec<(ContractParameter, ContractParameter)>),
    InteropInterface,
    Void,
}

impl ContractParameter {
    /// Converts a stack item. Containers reached twice on one path become
    /// `InteropInterface`.
    pub fn from_stack_item(item: &StackItem) -> Self {
        let mut visiting = HashSet::new();
        Self::convert(item, &mut visiting)
    }

    fn convert(item: &StackItem, visiting: &mut HashSet<usize>) -> Self {
        if let Some(id) = item.container_id() {
            if !visiting.insert(id) {
                return ContractParameter::InteropInterface;
            }
        }
        let parameter = match item {
            StackItem::Null => ContractParameter::Void,
            StackItem::Boolean(value) => ContractParameter::Boolean(*value),
            StackItem::Integer(value) => ContractParameter::Integer(value.clone()),
            StackItem::Buffer(value) => ContractParameter::ByteArray(value.to_vec()),
            StackItem::UInt160(value) => ContractParameter::Hash160(*value),
            StackItem::UInt256(value) => ContractParameter::Hash256(*value),
            StackItem::ECPoint(value) => ContractParameter::PublicKey(value.clone()),
            StackItem::Array(items) | StackItem::Struct(items) => ContractParameter::Array(
                items
                    .borrow()
                    .iter()
                    .map(|item| Self::convert(item, visiting))
                    .collect(),
            ),
            StackItem::Map(map) => ContractParameter::Map(
                map.borrow()
                    .entries()
                    .iter()
                    .map(|(key, value)| {
                        (Self::convert(key, visiting), Self::convert(value, visiting))
                    })
                    .collect(),
            ),
            StackItem::Iterator(_)
            | StackItem::Enumerator(_)
            | StackItem::StorageContext(_)
            | StackItem::Interop(_) => ContractParameter::InteropInterface,
        };
        if let Some(id) = item.container_id() {
            visiting.remove(&id);
        }
        parameter
    }
}

impl From<&StackItem> for ContractParameter {
    fn from(item: &StackItem) -> Self {
        Self::from_stack_item(item)
    }
}
