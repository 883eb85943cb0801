use std::collections::BTreeMap;

use neo_core::{UInt160, UInt256};
use neo_cryptography::ECPoint;
use serde::{Deserialize, Serialize};

/// UTXO account state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Account {
    pub hash: UInt160,
    pub is_frozen: bool,
    pub votes: Vec<ECPoint>,
    /// Fixed8 balance per asset id.
    pub balances: BTreeMap<UInt256, i64>,
}

impl Account {
    /// An empty account for `hash`.
    pub fn new(hash: UInt160) -> Self {
        Self {
            hash,
            ..Default::default()
        }
    }

    pub fn balance(&self, asset: &UInt256) -> i64 {
        self.balances.get(asset).copied().unwrap_or(0)
    }

    /// True when the account carries no state worth persisting.
    pub fn is_deletable(&self) -> bool {
        !self.is_frozen && self.votes.is_empty() && self.balances.values().all(|value| *value <= 0)
    }
}
