use std::collections::BTreeSet;

use neo_core::{CoreError, UInt160, UInt256};

#[test]
fn test_uint256_parse_and_display() {
    let text = "0x0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20";
    let hash: UInt256 = text.parse().unwrap();
    assert_eq!(hash.as_bytes()[0], 0x20);
    assert_eq!(hash.as_bytes()[31], 0x01);
    assert_eq!(hash.to_string(), text);
    assert_eq!(UInt256::LENGTH, 32);
}

#[test]
fn test_parse_without_prefix() {
    let with: UInt160 = "0x00000000000000000000000000000000000000ff".parse().unwrap();
    let without: UInt160 = "00000000000000000000000000000000000000ff".parse().unwrap();
    assert_eq!(with, without);
    assert_eq!(with.to_array()[0], 0xff);
}

#[test]
fn test_parse_errors() {
    assert!(matches!("0xzz".parse::<UInt160>(), Err(CoreError::InvalidHex(_))));
    assert_eq!(
        "0x00".parse::<UInt160>(),
        Err(CoreError::InvalidLength { expected: 20, found: 1 })
    );
}

#[test]
fn test_ordering_follows_little_endian_bytes() {
    let set: BTreeSet<UInt160> = [UInt160([2; 20]), UInt160([1; 20]), UInt160::zero()]
        .into_iter()
        .collect();
    let ordered: Vec<_> = set.into_iter().collect();
    assert_eq!(ordered, vec![UInt160::zero(), UInt160([1; 20]), UInt160([2; 20])]);
}

#[test]
fn test_to_hex_is_little_endian() {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xab;
    assert!(UInt160(bytes).to_hex().starts_with("ab"));
}
