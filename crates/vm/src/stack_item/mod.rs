//! Stack item module for the Neo Virtual Machine.
//!
//! This module provides the stack item implementations used in the Neo VM.

pub mod contract_parameter;
pub mod interop;
pub mod iterator;
pub mod map;
pub mod serialization;
pub mod stack_item;

pub use contract_parameter::ContractParameter;
pub use interop::{InteropValue, StorageContext};
pub use iterator::ItemIterator;
pub use map::MapItem;
pub use serialization::{deserialize, serialize, StackItemType};
pub use stack_item::{bigint_to_bytes, StackItem, MAX_BIG_INTEGER_SIZE};
