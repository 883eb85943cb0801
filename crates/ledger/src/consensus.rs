//! Consensus payload used as a script container by validators.

use neo_core::UInt256;
use neo_cryptography::hash256;
use neo_io::{helper, BinaryWriter, IoResult, MemoryReader, Serializable};
use serde::{Deserialize, Serialize};

/// Unsigned consensus message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsensusPayload {
    pub version: u32,
    pub prev_hash: UInt256,
    pub block_index: u32,
    pub validator_index: u16,
    pub timestamp: u32,
    pub data: Vec<u8>,
}

impl ConsensusPayload {
    pub fn message(&self) -> IoResult<Vec<u8>> {
        let mut writer = BinaryWriter::new();
        Serializable::serialize(self, &mut writer)?;
        Ok(writer.into_bytes())
    }

    pub fn hash(&self) -> UInt256 {
        UInt256(hash256(&self.message().unwrap_or_default()))
    }
}

impl Serializable for ConsensusPayload {
    fn size(&self) -> usize {
        4 + 32 + 4 + 2 + 4 + helper::get_var_bytes_size(&self.data)
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_u32(self.version);
        writer.write_bytes(self.prev_hash.as_bytes());
        writer.write_u32(self.block_index);
        writer.write_u16(self.validator_index);
        writer.write_u32(self.timestamp);
        writer.write_var_bytes(&self.data);
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        Ok(Self {
            version: reader.read_u32()?,
            prev_hash: UInt256(reader.read_array()?),
            block_index: reader.read_u32()?,
            validator_index: reader.read_u16()?,
            timestamp: reader.read_u32()?,
            data: reader.read_var_bytes(u16::MAX as usize)?,
        })
    }
}
