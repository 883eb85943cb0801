//! Encoded secp256r1 public keys.

use std::fmt;

use neo_config::ECPOINT_SIZE;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::PublicKey;
use serde::{Deserialize, Serialize};

use crate::{CryptoError, CryptoResult};

/// A secp256r1 point kept in its compressed SEC1 encoding.
///
/// The point at infinity is encoded as the single byte `0x00`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ECPoint(Vec<u8>);

impl ECPoint {
    /// Parses an encoded point, compressing uncompressed encodings.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        match bytes {
            [0x00] => Ok(Self::infinity()),
            [0x02 | 0x03, ..] if bytes.len() == ECPOINT_SIZE => Ok(Self(bytes.to_vec())),
            [0x04, ..] if bytes.len() == 65 => {
                let key = PublicKey::from_sec1_bytes(bytes)
                    .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
                Ok(Self(key.to_encoded_point(true).as_bytes().to_vec()))
            }
            _ => Err(CryptoError::InvalidKey(format!(
                "unsupported encoding of {} bytes",
                bytes.len()
            ))),
        }
    }

    /// The point at infinity.
    pub fn infinity() -> Self {
        Self(vec![0x00])
    }

    pub fn is_infinity(&self) -> bool {
        self.0 == [0x00]
    }

    /// Encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.clone()
    }

    /// Decodes the point on the curve.
    pub fn to_public_key(&self) -> CryptoResult<PublicKey> {
        PublicKey::from_sec1_bytes(&self.0).map_err(|e| CryptoError::InvalidKey(e.to_string()))
    }
}

impl fmt::Display for ECPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for ECPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ECPoint({self})")
    }
}
