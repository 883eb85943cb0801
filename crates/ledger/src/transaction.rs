//! Transactions as exposed to scripts.

use neo_core::{UInt160, UInt256};
use neo_cryptography::hash256;
use neo_io::{helper, BinaryWriter, IoError, IoResult, MemoryReader, Serializable};
use serde::{Deserialize, Serialize};

const MAX_ATTRIBUTES: usize = 16;
const MAX_IO: usize = u16::MAX as usize;
const MAX_SCRIPT: usize = 65536;

/// Transaction kinds of the Neo 2.x protocol.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Miner = 0x00,
    Issue = 0x01,
    Claim = 0x02,
    Enrollment = 0x20,
    Register = 0x40,
    Contract = 0x80,
    State = 0x90,
    Publish = 0xd0,
    Invocation = 0xd1,
}

impl TryFrom<u8> for TransactionType {
    type Error = IoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x00 => Self::Miner,
            0x01 => Self::Issue,
            0x02 => Self::Claim,
            0x20 => Self::Enrollment,
            0x40 => Self::Register,
            0x80 => Self::Contract,
            0x90 => Self::State,
            0xd0 => Self::Publish,
            0xd1 => Self::Invocation,
            other => {
                return Err(IoError::InvalidData(format!(
                    "unknown transaction type {other:#04x}"
                )))
            }
        })
    }
}

/// Attribute usage byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeUsage(pub u8);

impl AttributeUsage {
    pub const CONTRACT_HASH: Self = Self(0x00);
    pub const ECDH02: Self = Self(0x02);
    pub const ECDH03: Self = Self(0x03);
    pub const SCRIPT: Self = Self(0x20);
    pub const VOTE: Self = Self(0x30);
    pub const DESCRIPTION_URL: Self = Self(0x81);
    pub const DESCRIPTION: Self = Self(0x90);
    pub const HASH1: Self = Self(0xa1);
    pub const HASH15: Self = Self(0xaf);
    pub const REMARK: Self = Self(0xf0);

    /// Usages carrying a 32-byte hash.
    pub fn is_hash(self) -> bool {
        self == Self::CONTRACT_HASH
            || self == Self::VOTE
            || (Self::HASH1.0..=Self::HASH15.0).contains(&self.0)
    }

    /// Usages carrying the x coordinate of a public key.
    pub fn is_ecdh(self) -> bool {
        self == Self::ECDH02 || self == Self::ECDH03
    }
}

/// Transaction attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub usage: AttributeUsage,
    pub data: Vec<u8>,
}

impl Attribute {
    pub fn new(usage: AttributeUsage, data: Vec<u8>) -> Self {
        Self { usage, data }
    }
}

impl Serializable for Attribute {
    fn size(&self) -> usize {
        let fixed =
            self.usage.is_hash() || self.usage.is_ecdh() || self.usage == AttributeUsage::SCRIPT;
        1 + if fixed {
            self.data.len()
        } else if self.usage == AttributeUsage::DESCRIPTION_URL {
            1 + self.data.len()
        } else {
            helper::get_var_bytes_size(&self.data)
        }
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_u8(self.usage.0);
        if self.usage.is_hash() || self.usage.is_ecdh() || self.usage == AttributeUsage::SCRIPT {
            writer.write_bytes(&self.data);
        } else if self.usage == AttributeUsage::DESCRIPTION_URL {
            let len = u8::try_from(self.data.len())
                .map_err(|_| IoError::InvalidData("description url too long".to_string()))?;
            writer.write_u8(len);
            writer.write_bytes(&self.data);
        } else {
            writer.write_var_bytes(&self.data);
        }
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let usage = AttributeUsage(reader.read_u8()?);
        let data = if usage.is_hash() || usage.is_ecdh() {
            reader.read_memory(32)?.to_vec()
        } else if usage == AttributeUsage::SCRIPT {
            reader.read_memory(20)?.to_vec()
        } else if usage == AttributeUsage::DESCRIPTION_URL {
            let len = reader.read_u8()? as usize;
            reader.read_memory(len)?.to_vec()
        } else {
            reader.read_var_bytes(MAX_SCRIPT)?
        };
        Ok(Self { usage, data })
    }
}

/// Reference to an output of a previous transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Input {
    pub prev_hash: UInt256,
    pub prev_index: u16,
}

impl Serializable for Input {
    fn size(&self) -> usize {
        34
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_bytes(self.prev_hash.as_bytes());
        writer.write_u16(self.prev_index);
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        Ok(Self {
            prev_hash: UInt256(reader.read_array()?),
            prev_index: reader.read_u16()?,
        })
    }
}

/// Transaction output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub asset: UInt256,
    /// Fixed8 amount.
    pub value: i64,
    pub address: UInt160,
}

impl Serializable for Output {
    fn size(&self) -> usize {
        32 + 8 + 20
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_bytes(self.asset.as_bytes());
        writer.write_i64(self.value);
        writer.write_bytes(self.address.as_bytes());
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        Ok(Self {
            asset: UInt256(reader.read_array()?),
            value: reader.read_i64()?,
            address: UInt160(reader.read_array()?),
        })
    }
}

/// A transaction. Only invocation transactions carry a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub tx_type: TransactionType,
    pub version: u8,
    pub attributes: Vec<Attribute>,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub script: Option<Vec<u8>>,
    /// Fixed8 system fee attached to invocation transactions.
    pub gas: i64,
}

impl Transaction {
    /// Creates an invocation transaction running `script`.
    pub fn invocation(script: Vec<u8>) -> Self {
        Self {
            tx_type: TransactionType::Invocation,
            version: 1,
            attributes: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            script: Some(script),
            gas: 0,
        }
    }

    /// Creates a contract transaction moving assets.
    pub fn contract(inputs: Vec<Input>, outputs: Vec<Output>) -> Self {
        Self {
            tx_type: TransactionType::Contract,
            version: 0,
            attributes: Vec::new(),
            inputs,
            outputs,
            script: None,
            gas: 0,
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Bytes covered by witnesses.
    pub fn message(&self) -> IoResult<Vec<u8>> {
        let mut writer = BinaryWriter::new();
        Serializable::serialize(self, &mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Double SHA-256 of the unsigned transaction.
    pub fn hash(&self) -> UInt256 {
        UInt256(hash256(&self.message().unwrap_or_default()))
    }

    /// Script hashes named by `Script` attributes.
    pub fn script_attribute_hashes(&self) -> Vec<UInt160> {
        self.attributes
            .iter()
            .filter(|attribute| attribute.usage == AttributeUsage::SCRIPT)
            .filter_map(|attribute| UInt160::from_bytes(&attribute.data).ok())
            .collect()
    }
}

impl Serializable for Transaction {
    fn size(&self) -> usize {
        let exclusive = match (&self.tx_type, &self.script) {
            (TransactionType::Invocation, Some(script)) => {
                helper::get_var_bytes_size(script) + if self.version >= 1 { 8 } else { 0 }
            }
            _ => 0,
        };
        2 + exclusive
            + helper::get_array_size(&self.attributes)
            + helper::get_array_size(&self.inputs)
            + helper::get_array_size(&self.outputs)
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_u8(self.tx_type as u8);
        writer.write_u8(self.version);
        if self.tx_type == TransactionType::Invocation {
            writer.write_var_bytes(self.script.as_deref().unwrap_or_default());
            if self.version >= 1 {
                writer.write_i64(self.gas);
            }
        }
        helper::serialize_array(&self.attributes, writer)?;
        helper::serialize_array(&self.inputs, writer)?;
        helper::serialize_array(&self.outputs, writer)?;
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let tx_type = TransactionType::try_from(reader.read_u8()?)?;
        let version = reader.read_u8()?;
        let (script, gas) = if tx_type == TransactionType::Invocation {
            let script = reader.read_var_bytes(MAX_SCRIPT)?;
            let gas = if version >= 1 { reader.read_i64()? } else { 0 };
            (Some(script), gas)
        } else {
            (None, 0)
        };
        Ok(Self {
            tx_type,
            version,
            attributes: helper::deserialize_array(reader, MAX_ATTRIBUTES)?,
            inputs: helper::deserialize_array(reader, MAX_IO)?,
            outputs: helper::deserialize_array(reader, MAX_IO)?,
            script,
            gas,
        })
    }
}
