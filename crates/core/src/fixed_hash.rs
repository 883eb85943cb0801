//! Shared implementation for fixed-width little-endian hash types.

/// Implements construction, parsing, formatting and serde for a fixed-width hash newtype.
///
/// Bytes are stored little-endian. The string form is the big-endian hex with a `0x`
/// prefix, matching how Neo displays script hashes and transaction ids.
macro_rules! fixed_hash {
    ($name:ident, $len:expr) => {
        impl $name {
            /// Number of bytes in this hash.
            pub const LENGTH: usize = $len;

            /// Returns the all-zero value.
            pub const fn zero() -> Self {
                Self([0u8; $len])
            }

            /// Creates a value from little-endian bytes.
            pub fn from_bytes(bytes: &[u8]) -> $crate::CoreResult<Self> {
                if bytes.len() != $len {
                    return Err($crate::CoreError::InvalidLength {
                        expected: $len,
                        found: bytes.len(),
                    });
                }
                let mut value = [0u8; $len];
                value.copy_from_slice(bytes);
                Ok(Self(value))
            }

            /// Returns the little-endian bytes.
            pub fn to_array(&self) -> [u8; $len] {
                self.0
            }

            /// Returns the little-endian bytes as a slice.
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            /// Returns true when every byte is zero.
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            /// Lowercase little-endian hex without prefix, used as a map key.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::zero()
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(value: [u8; $len]) -> Self {
                Self(value)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut reversed = self.0;
                reversed.reverse();
                write!(f, "0x{}", hex::encode(reversed))
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.strip_prefix("0x").unwrap_or(s);
                let mut bytes =
                    hex::decode(trimmed).map_err(|e| $crate::CoreError::InvalidHex(e.to_string()))?;
                bytes.reverse();
                Self::from_bytes(&bytes)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use fixed_hash;
