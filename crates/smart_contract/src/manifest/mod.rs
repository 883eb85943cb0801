//! Manifests describing the interface of native contracts.

pub mod contract_abi;
pub mod contract_manifest;

pub use contract_abi::{ContractAbi, ContractMethodDescriptor, ContractParameterDefinition};
pub use contract_manifest::ContractManifest;
