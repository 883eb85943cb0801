//! Protocol settings exposed to scripts through the ledger.

use neo_core::UInt256;
use serde::{Deserialize, Serialize};

use crate::{BLOCK_HEIGHT_YEAR, SECONDS_PER_BLOCK};

const GOVERNING_TOKEN: &str = "0xc56f33fc6ecfcd0c225c4ab356fee59390af8560be0e930faebe74a6daff7c9b";
const UTILITY_TOKEN: &str = "0x602c79718b16e442de58778e148d0b1084e3b2dffd5de6b7b16cee7969282de7";

/// Settings of the network the engine executes against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolSettings {
    /// Target block interval in seconds.
    pub seconds_per_block: u64,
    /// Asset id of the governing token (NEO).
    pub governing_token: UInt256,
    /// Asset id of the utility token (GAS).
    pub utility_token: UInt256,
    /// Blocks counted as one year when renewing assets.
    pub blocks_per_year: u32,
}

impl Default for ProtocolSettings {
    fn default() -> Self {
        Self {
            seconds_per_block: SECONDS_PER_BLOCK,
            governing_token: GOVERNING_TOKEN.parse().unwrap_or_default(),
            utility_token: UTILITY_TOKEN.parse().unwrap_or_default(),
            blocks_per_year: BLOCK_HEIGHT_YEAR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_token_hashes() {
        let settings = ProtocolSettings::default();
        assert_eq!(settings.governing_token.to_string(), GOVERNING_TOKEN);
        assert_eq!(settings.utility_token.to_string(), UTILITY_TOKEN);
        assert_eq!(settings.seconds_per_block, 15);
    }
}
