use bitflags::bitflags;
use neo_core::UInt160;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Flags attached to a storage item.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StorageFlags: u8 {
        const NONE = 0;
        const CONSTANT = 1;
    }
}

/// A contract storage row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageItem {
    pub hash: UInt160,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub flags: StorageFlags,
}

impl StorageItem {
    pub fn new(hash: UInt160, key: Vec<u8>, value: Vec<u8>) -> Self {
        Self {
            hash,
            key,
            value,
            flags: StorageFlags::NONE,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.flags.contains(StorageFlags::CONSTANT)
    }
}
