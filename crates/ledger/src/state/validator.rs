use neo_cryptography::ECPoint;
use serde::{Deserialize, Serialize};

/// Registered validator candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub public_key: ECPoint,
    pub registered: bool,
    /// Fixed8 vote weight.
    pub votes: i64,
}

impl Validator {
    pub fn new(public_key: ECPoint) -> Self {
        Self {
            public_key,
            registered: true,
            votes: 0,
        }
    }
}
