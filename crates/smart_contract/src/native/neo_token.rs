//! The native NEO governing token.

use std::ops::Deref;

use neo_vm::{ExecutionContext, Machine, NativeContract, NativeMethod, StackItem, VmResult};
use num_bigint::BigInt;

use super::nep5::Nep5Token;

/// Total NEO supply, all of it minted at genesis.
pub const NEO_TOTAL_SUPPLY: u64 = 100_000_000;

/// Indivisible NEP-5 token reached through `Neo.Native.Tokens.NEO`.
#[derive(Debug, Clone)]
pub struct NeoToken {
    token: Nep5Token,
}

impl NeoToken {
    pub const SERVICE_NAME: &'static str = "Neo.Native.Tokens.NEO";

    pub fn new() -> Self {
        Self {
            token: Nep5Token::new(Self::SERVICE_NAME, "NEO", "neo", 0),
        }
    }
}

impl Default for NeoToken {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for NeoToken {
    type Target = Nep5Token;

    fn deref(&self) -> &Nep5Token {
        &self.token
    }
}

impl NativeContract for NeoToken {
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

    fn initialize(
        &self,
        machine: &mut Machine<'_>,
        context: &mut ExecutionContext,
    ) -> VmResult<()> {
        if self.total_supply(machine) > BigInt::from(0) {
            return Ok(());
        }
        let account = machine.blockchain.current_block().next_consensus;
        self.mint(machine, context, account, &BigInt::from(NEO_TOTAL_SUPPLY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neo_is_indivisible() {
        let neo = NeoToken::new();
        assert_eq!(neo.symbol(), "neo");
        assert_eq!(neo.decimals(), 0);
        assert_eq!(neo.factor(), BigInt::from(1));
        assert_ne!(neo.hash(), crate::native::GasToken::new().hash());
    }
}
