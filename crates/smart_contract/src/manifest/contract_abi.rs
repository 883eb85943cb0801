//! Application binary interface of a contract.

use neo_core::UInt160;
use neo_ledger::ContractParameterType;
use neo_vm::NativeMethod;
use serde::{Deserialize, Serialize};

/// A named, typed method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractParameterDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub parameter_type: ContractParameterType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractMethodDescriptor {
    pub name: String,
    pub parameters: Vec<ContractParameterDefinition>,
    #[serde(rename = "returnType")]
    pub return_type: ContractParameterType,
}

impl From<&NativeMethod> for ContractMethodDescriptor {
    fn from(method: &NativeMethod) -> Self {
        Self {
            name: method.name.to_string(),
            parameters: method
                .parameters
                .iter()
                .map(|(name, parameter_type)| ContractParameterDefinition {
                    name: name.to_string(),
                    parameter_type: *parameter_type,
                })
                .collect(),
            return_type: method.return_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAbi {
    pub hash: UInt160,
    pub methods: Vec<ContractMethodDescriptor>,
}

impl ContractAbi {
    pub fn method(&self, name: &str) -> Option<&ContractMethodDescriptor> {
        self.methods.iter().find(|method| method.name == name)
    }
}
