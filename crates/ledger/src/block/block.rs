//! Full block.

use neo_core::UInt256;
use serde::{Deserialize, Serialize};

use super::Header;
use crate::Transaction;

/// A header with its transactions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    pub header: Header,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(header: Header, transactions: Vec<Transaction>) -> Self {
        Self {
            header,
            transactions,
        }
    }

    pub fn hash(&self) -> UInt256 {
        self.header.hash()
    }

    pub fn index(&self) -> u32 {
        self.header.index
    }
}
