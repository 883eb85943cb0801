//! The native GAS utility token.

use std::ops::Deref;

use neo_vm::{ExecutionContext, Machine, NativeContract, NativeMethod, StackItem, VmResult};
use num_bigint::BigInt;

use super::nep5::Nep5Token;

/// Whole GAS tokens minted to the first consensus address.
pub const GAS_GENESIS_SUPPLY: u64 = 30_000_000;

/// NEP-5 token with 8 decimals reached through `Neo.Native.Tokens.GAS`.
#[derive(Debug, Clone)]
pub struct GasToken {
    token: Nep5Token,
}

impl GasToken {
    pub const SERVICE_NAME: &'static str = "Neo.Native.Tokens.GAS";

    pub fn new() -> Self {
        Self {
            token: Nep5Token::new(Self::SERVICE_NAME, "GAS", "gas", 8),
        }
    }
}

impl Default for GasToken {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for GasToken {
    type Target = Nep5Token;

    fn deref(&self) -> &Nep5Token {
        &self.token
    }
}

impl NativeContract for GasToken {
    fn service_name(&self) -> &str {
        self.token.service_name()
    }

    fn script(&self) -> &[u8] {
        self.token.script()
    }

    fn methods(&self) -> &[NativeMethod] {
        self.token.methods()
    }

    fn supported_standards(&self) -> &[&'static str] {
        self.token.supported_standards()
    }

    fn invoke(
        &self,
        machine: &mut Machine<'_>,
        context: &mut ExecutionContext,
        method: &str,
        args: &[StackItem],
    ) -> VmResult<StackItem> {
        self.token.invoke(machine, context, method, args)
    }

    /// Mints the genesis supply to the consensus address of the current block once.
    fn initialize(
        &self,
        machine: &mut Machine<'_>,
        context: &mut ExecutionContext,
    ) -> VmResult<()> {
        if self.total_supply(machine) > BigInt::from(0) {
            return Ok(());
        }
        let account = machine.blockchain.current_block().next_consensus;
        let amount = BigInt::from(GAS_GENESIS_SUPPLY) * self.factor();
        self.mint(machine, context, account, &amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gas_token_metadata() {
        let gas = GasToken::new();
        assert_eq!(gas.service_name(), "Neo.Native.Tokens.GAS");
        assert_eq!(gas.name(), "GAS");
        assert_eq!(gas.decimals(), 8);
        assert_eq!(gas.factor(), BigInt::from(100_000_000));
        assert_eq!(gas.supported_standards(), &["NEP-5", "NEP-10"]);
        assert!(gas.method("transfer").is_some_and(|method| !method.safe));
    }
}
