//! 256-bit hash used for block, transaction and asset identifiers.

use crate::fixed_hash::fixed_hash;

/// A 32-byte hash, stored little-endian.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UInt256(pub [u8; 32]);

fixed_hash!(UInt256, 32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_prefix() {
        let text = "00".repeat(31) + "2a";
        let hash: UInt256 = text.parse().unwrap();
        assert_eq!(hash.as_bytes()[0], 0x2a);
        assert_eq!(hash.to_string(), format!("0x{}", text));
    }

    #[test]
    fn test_invalid_hex() {
        assert!("0xzz".parse::<UInt256>().is_err());
    }
}
