//! # Neo Smart Contract
//!
//! Native contracts for the legacy script engine: the NEP-5 token base, the NEO and
//! GAS tokens built on it and the Policy contract, plus the manifests describing
//! their interfaces.
//!
//! [`natives`] builds the registry an [`neo_vm::ExecutionEngine`] is created with.

pub mod error;
pub mod manifest;
pub mod native;

pub use error::{ContractError, ContractResult};
pub use manifest::ContractManifest;
pub use native::{natives, GasToken, NeoToken, Nep5Token, PolicyContract};
