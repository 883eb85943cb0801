//! Serialization traits and utilities for Neo objects.

use crate::{BinaryWriter, IoResult, MemoryReader};

/// Represents objects with a binary wire form.
pub trait Serializable {
    /// The size of the object in bytes after serialization.
    fn size(&self) -> usize;

    /// Serializes the object using the specified BinaryWriter.
    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()>;

    /// Deserializes the object using the specified MemoryReader.
    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self>
    where
        Self: Sized;
}

/// Extension methods for serializable objects.
pub trait SerializableExt: Serializable {
    /// Converts the object to a byte array.
    fn to_array(&self) -> IoResult<Vec<u8>> {
        let mut writer = BinaryWriter::new();
        self.serialize(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Creates an object from a byte array.
    fn from_array(data: &[u8]) -> IoResult<Self>
    where
        Self: Sized,
    {
        let mut reader = MemoryReader::new(data);
        Self::deserialize(&mut reader)
    }
}

impl<T: Serializable> SerializableExt for T {}

/// Helper functions for serialization.
pub mod helper {
    use super::Serializable;
    use crate::{BinaryWriter, IoResult, MemoryReader};

    /// Serializes a collection of serializable objects.
    pub fn serialize_array<T: Serializable>(
        items: &[T],
        writer: &mut BinaryWriter,
    ) -> IoResult<()> {
        writer.write_var_int(items.len() as u64);
        for item in items {
            item.serialize(writer)?;
        }
        Ok(())
    }

    /// Deserializes a collection of serializable objects.
    pub fn deserialize_array<T: Serializable>(
        reader: &mut MemoryReader,
        max: usize,
    ) -> IoResult<Vec<T>> {
        let count = reader.read_var_int(max as u64)? as usize;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(T::deserialize(reader)?);
        }
        Ok(items)
    }

    /// Gets the size of a serialized array.
    pub fn get_array_size<T: Serializable>(items: &[T]) -> usize {
        let mut size = get_var_size(items.len() as u64);
        for item in items {
            size += item.size();
        }
        size
    }

    /// Gets the size of a variable-length integer.
    pub fn get_var_size(value: u64) -> usize {
        if value < 0xFD {
            1
        } else if value <= 0xFFFF {
            3
        } else if value <= 0xFFFFFFFF {
            5
        } else {
            9
        }
    }

    /// Gets the size of a var-bytes field.
    pub fn get_var_bytes_size(value: &[u8]) -> usize {
        get_var_size(value.len() as u64) + value.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pair {
        left: u32,
        right: Vec<u8>,
    }

    impl Serializable for Pair {
        fn size(&self) -> usize {
            4 + helper::get_var_bytes_size(&self.right)
        }

        fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
            writer.write_u32(self.left);
            writer.write_var_bytes(&self.right);
            Ok(())
        }

        fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
            Ok(Pair {
                left: reader.read_u32()?,
                right: reader.read_var_bytes(1024)?,
            })
        }
    }

    #[test]
    fn test_serialize_array() {
        let items = vec![
            Pair { left: 1, right: vec![] },
            Pair { left: 2, right: vec![9, 9] },
        ];

        let mut writer = BinaryWriter::new();
        helper::serialize_array(&items, &mut writer).unwrap();
        let bytes = writer.to_bytes();
        assert_eq!(bytes.len(), helper::get_array_size(&items));

        let mut reader = MemoryReader::new(&bytes);
        let back: Vec<Pair> = helper::deserialize_array(&mut reader, 16).unwrap();
        assert_eq!(items, back);
    }

    #[test]
    fn test_get_var_size() {
        assert_eq!(helper::get_var_size(0), 1);
        assert_eq!(helper::get_var_size(252), 1);
        assert_eq!(helper::get_var_size(253), 3);
        assert_eq!(helper::get_var_size(u16::MAX as u64), 3);
        assert_eq!(helper::get_var_size(65536), 5);
        assert_eq!(helper::get_var_size(0xFFFFFFFF), 5);
        assert_eq!(helper::get_var_size(0x100000000), 9);
    }
}
