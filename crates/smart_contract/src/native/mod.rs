//! Native contracts of the legacy engine.
//!
//! Every contract here implements [`NativeContract`]: it is reached through a
//! `SYSCALL` of its service name, either directly or by calling its script hash.

pub mod gas_token;
pub mod neo_token;
pub mod nep5;
pub mod policy_contract;

use std::sync::Arc;

use neo_vm::{NativeContract, NativeRegistry, StackItem, VmError, VmResult};
use num_bigint::BigInt;

pub use gas_token::GasToken;
pub use neo_token::NeoToken;
pub use nep5::Nep5Token;
pub use policy_contract::PolicyContract;

/// Registry holding the NEO and GAS tokens and the Policy contract.
pub fn natives() -> NativeRegistry {
    let contracts: [Arc<dyn NativeContract>; 3] = [
        Arc::new(NeoToken::new()),
        Arc::new(GasToken::new()),
        Arc::new(PolicyContract::new()),
    ];
    contracts
        .into_iter()
        .fold(NativeRegistry::new(), |registry, contract| registry.with(contract))
}

/// Parameter `index` of a native call.
pub(crate) fn argument(args: &[StackItem], index: usize) -> VmResult<&StackItem> {
    args.get(index).ok_or(VmError::InvalidIndex)
}

/// Integer held by a native storage row.
pub(crate) fn storage_int(bytes: &[u8]) -> BigInt {
    BigInt::from_signed_bytes_le(bytes)
}
