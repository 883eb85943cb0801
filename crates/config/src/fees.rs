//! Gas fee schedule.
//!
//! Gas amounts are Fixed8 integers: one GAS is `100_000_000`.

use serde::{Deserialize, Serialize};

/// A Fixed8 gas amount.
pub type Fixed8 = i64;

/// One whole GAS in Fixed8 units.
pub const ONE_GAS: Fixed8 = 100_000_000;

/// Fee tiers charged by opcodes and syscalls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// Base fee charged by ordinary opcodes and syscalls (0.001 GAS).
    pub one: Fixed8,
    /// Fee charged by push opcodes.
    pub push: Fixed8,
    /// Ten times the base fee.
    pub ten: Fixed8,
    /// Twenty times the base fee.
    pub twenty: Fixed8,
    /// One hundred times the base fee.
    pub one_hundred: Fixed8,
    /// Two hundred times the base fee.
    pub two_hundred: Fixed8,
    /// One thousand times the base fee.
    pub one_thousand: Fixed8,
    /// Base price of contract creation and migration.
    pub contract_create: Fixed8,
    /// Surcharge for contracts declaring storage.
    pub contract_storage: Fixed8,
    /// Surcharge for contracts declaring dynamic invoke.
    pub contract_dynamic_invoke: Fixed8,
    /// Price of registering an asset.
    pub asset_create: Fixed8,
    /// Price of renewing an asset for one year.
    pub asset_renew_per_year: Fixed8,
    /// Price of registering a validator.
    pub validator_register: Fixed8,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        let one = ONE_GAS / 1000;
        Self {
            one,
            push: one,
            ten: one * 10,
            twenty: one * 20,
            one_hundred: one * 100,
            two_hundred: one * 200,
            one_thousand: one * 1000,
            contract_create: 100 * ONE_GAS,
            contract_storage: 400 * ONE_GAS,
            contract_dynamic_invoke: 500 * ONE_GAS,
            asset_create: 5000 * ONE_GAS,
            asset_renew_per_year: 5000 * ONE_GAS,
            validator_register: 1000 * ONE_GAS,
        }
    }
}

impl FeeSchedule {
    /// Price of `Storage.Put` for the given key and value lengths.
    ///
    /// Every started kilobyte costs [`FeeSchedule::one_thousand`].
    pub fn storage_put(&self, key_len: usize, value_len: usize) -> Fixed8 {
        let total = (key_len + value_len) as i64;
        let ratio = (total - 1) / 1024 + 1;
        self.one_thousand.saturating_mul(ratio)
    }

    /// Price of creating or migrating a contract with the given property flags.
    pub fn contract(&self, has_storage: bool, has_dynamic_invoke: bool) -> Fixed8 {
        let mut fee = self.contract_create;
        if has_storage {
            fee += self.contract_storage;
        }
        if has_dynamic_invoke {
            fee += self.contract_dynamic_invoke;
        }
        fee
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers() {
        let fees = FeeSchedule::default();
        assert_eq!(fees.one, 100_000);
        assert_eq!(fees.push, fees.one);
        assert_eq!(fees.one_thousand, ONE_GAS);
    }

    #[test]
    fn test_storage_put_price() {
        let fees = FeeSchedule::default();
        assert_eq!(fees.storage_put(1, 1), fees.one_thousand);
        assert_eq!(fees.storage_put(512, 512), fees.one_thousand);
        assert_eq!(fees.storage_put(512, 513), fees.one_thousand * 2);
        assert_eq!(fees.storage_put(0, 0), fees.one_thousand);
    }

    #[test]
    fn test_contract_price() {
        let fees = FeeSchedule::default();
        assert_eq!(fees.contract(false, false), 100 * ONE_GAS);
        assert_eq!(fees.contract(true, false), 500 * ONE_GAS);
        assert_eq!(fees.contract(true, true), 1000 * ONE_GAS);
    }
}
