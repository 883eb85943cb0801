//! Contract manifest implementation.
//!
//! Native contracts publish a manifest built from their method table: the ABI, the
//! standards they implement and the methods that only read state.

use neo_vm::NativeContract;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ContractError, ContractResult};
use crate::manifest::{ContractAbi, ContractMethodDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractManifest {
    /// Service name of the contract.
    pub name: String,
    #[serde(rename = "supportedstandards")]
    pub supported_standards: Vec<String>,
    pub abi: ContractAbi,
    /// Methods that may be called from any trigger.
    #[serde(rename = "safemethods")]
    pub safe_methods: Vec<String>,
}

impl ContractManifest {
    pub fn from_native(native: &dyn NativeContract) -> Self {
        let methods = native.methods();
        Self {
            name: native.service_name().to_string(),
            supported_standards: native
                .supported_standards()
                .iter()
                .map(|standard| standard.to_string())
                .collect(),
            abi: ContractAbi {
                hash: native.hash(),
                methods: methods.iter().map(ContractMethodDescriptor::from).collect(),
            },
            safe_methods: methods
                .iter()
                .filter(|method| method.safe)
                .map(|method| method.name.to_string())
                .collect(),
        }
    }

    pub fn supports_standard(&self, standard: &str) -> bool {
        self.supported_standards.iter().any(|s| s == standard)
    }

    pub fn is_safe_method(&self, name: &str) -> bool {
        self.safe_methods.iter().any(|method| method == name)
    }

    pub fn to_json(&self) -> ContractResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parses a manifest, rejecting safe methods missing from the ABI.
    pub fn from_json(json: &str) -> ContractResult<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> ContractResult<()> {
        if self.name.is_empty() {
            return Err(ContractError::InvalidManifest("empty name".to_string()));
        }
        match self
            .safe_methods
            .iter()
            .find(|name| self.abi.method(name).is_none())
        {
            Some(name) => Err(ContractError::InvalidManifest(format!(
                "safe method {name} is not in the ABI"
            ))),
            None => Ok(()),
        }
    }
}
