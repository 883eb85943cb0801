//! Block header.

use neo_core::{UInt160, UInt256};
use neo_cryptography::hash256;
use neo_io::{BinaryWriter, IoResult, MemoryReader, Serializable};
use serde::{Deserialize, Serialize};

/// Unsigned block header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Header {
    pub version: u32,
    pub prev_hash: UInt256,
    pub merkle_root: UInt256,
    pub timestamp: u32,
    pub index: u32,
    pub consensus_data: u64,
    pub next_consensus: UInt160,
}

impl Header {
    /// Bytes covered by witnesses.
    pub fn message(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        self.write_unsigned(&mut writer);
        writer.into_bytes()
    }

    /// Double SHA-256 of the unsigned header.
    pub fn hash(&self) -> UInt256 {
        UInt256(hash256(&self.message()))
    }

    fn write_unsigned(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.version);
        writer.write_bytes(self.prev_hash.as_bytes());
        writer.write_bytes(self.merkle_root.as_bytes());
        writer.write_u32(self.timestamp);
        writer.write_u32(self.index);
        writer.write_u64(self.consensus_data);
        writer.write_bytes(self.next_consensus.as_bytes());
    }
}

impl Serializable for Header {
    fn size(&self) -> usize {
        4 + 32 + 32 + 4 + 4 + 8 + 20
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        self.write_unsigned(writer);
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        Ok(Self {
            version: reader.read_u32()?,
            prev_hash: UInt256(reader.read_array()?),
            merkle_root: UInt256(reader.read_array()?),
            timestamp: reader.read_u32()?,
            index: reader.read_u32()?,
            consensus_data: reader.read_u64()?,
            next_consensus: UInt160(reader.read_array()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_io::SerializableExt;

    #[test]
    fn test_hash_changes_with_index() {
        let a = Header {
            index: 1,
            ..Default::default()
        };
        let b = Header {
            index: 2,
            ..Default::default()
        };
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_serialization_size() {
        let header = Header {
            timestamp: 1_500_000_000,
            ..Default::default()
        };
        let bytes = header.to_array().unwrap();
        assert_eq!(bytes.len(), header.size());
        assert_eq!(Header::from_array(&bytes).unwrap(), header);
    }
}
