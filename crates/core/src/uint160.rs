//! 160-bit hash used for script hashes and account addresses.

use crate::fixed_hash::fixed_hash;

/// A 20-byte script hash, stored little-endian.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UInt160(pub [u8; 20]);

fixed_hash!(UInt160, 20);
