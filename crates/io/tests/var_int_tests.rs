//! Property tests for the var-int codec.

use neo_io::{BinaryWriter, MemoryReader};
use proptest::prelude::*;

proptest! {
    #[test]
    fn var_int_decodes_what_was_written(value in any::<u64>()) {
        let mut writer = BinaryWriter::new();
        writer.write_var_int(value);
        let bytes = writer.into_bytes();
        prop_assert_eq!(bytes.len(), neo_io::helper::get_var_size(value));
        let mut reader = MemoryReader::new(&bytes);
        prop_assert_eq!(reader.read_var_int(u64::MAX).unwrap(), value);
    }

    #[test]
    fn var_bytes_respects_max(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut writer = BinaryWriter::new();
        writer.write_var_bytes(&data);
        let bytes = writer.into_bytes();
        let mut reader = MemoryReader::new(&bytes);
        if data.len() > 16 {
            prop_assert!(reader.read_var_bytes(16).is_err());
        } else {
            prop_assert_eq!(reader.read_var_bytes(16).unwrap(), data);
        }
    }
}
