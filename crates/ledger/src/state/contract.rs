use bitflags::bitflags;
use neo_core::UInt160;
use neo_cryptography::hash160;
use serde::{Deserialize, Serialize};

/// Parameter and return types declared by deployed contracts.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractParameterType {
    Signature = 0x00,
    Boolean = 0x01,
    Integer = 0x02,
    Hash160 = 0x03,
    Hash256 = 0x04,
    ByteArray = 0x05,
    PublicKey = 0x06,
    String = 0x07,
    Array = 0x10,
    Map = 0x12,
    InteropInterface = 0xf0,
    Void = 0xff,
}

impl ContractParameterType {
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0x00 => Self::Signature,
            0x01 => Self::Boolean,
            0x02 => Self::Integer,
            0x03 => Self::Hash160,
            0x04 => Self::Hash256,
            0x05 => Self::ByteArray,
            0x06 => Self::PublicKey,
            0x07 => Self::String,
            0x10 => Self::Array,
            0x12 => Self::Map,
            0xf0 => Self::InteropInterface,
            0xff => Self::Void,
            _ => return None,
        })
    }
}

bitflags! {
    /// Capabilities a contract declares at deployment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ContractPropertyState: u8 {
        const NO_PROPERTY = 0;
        const HAS_STORAGE = 1 << 0;
        const HAS_DYNAMIC_INVOKE = 1 << 1;
        const PAYABLE = 1 << 2;
    }
}

/// Deployed contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub script: Vec<u8>,
    pub parameter_list: Vec<ContractParameterType>,
    pub return_type: ContractParameterType,
    pub properties: ContractPropertyState,
    pub name: String,
    pub code_version: String,
    pub author: String,
    pub email: String,
    pub description: String,
    pub hash: UInt160,
}

impl Contract {
    /// Creates a contract record; the hash is derived from `script`.
    pub fn new(script: Vec<u8>, properties: ContractPropertyState) -> Self {
        let hash = UInt160(hash160(&script));
        Self {
            script,
            parameter_list: Vec::new(),
            return_type: ContractParameterType::Void,
            properties,
            name: String::new(),
            code_version: String::new(),
            author: String::new(),
            email: String::new(),
            description: String::new(),
            hash,
        }
    }

    pub fn has_storage(&self) -> bool {
        self.properties.contains(ContractPropertyState::HAS_STORAGE)
    }

    pub fn has_dynamic_invoke(&self) -> bool {
        self.properties
            .contains(ContractPropertyState::HAS_DYNAMIC_INVOKE)
    }

    pub fn is_payable(&self) -> bool {
        self.properties.contains(ContractPropertyState::PAYABLE)
    }
}
