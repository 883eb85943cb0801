//! secp256r1 signature verification and verification scripts.

use neo_core::UInt160;
use p256::ecdsa::{signature::Verifier, Signature, VerifyingKey};

use crate::{hash160, CryptoError, CryptoResult, ECPoint};

const PUSHBYTES33: u8 = 0x21;
const CHECKSIG: u8 = 0xac;

/// Verifies a 64-byte `r || s` signature over `message` (hashed with SHA-256).
///
/// Returns `Ok(false)` for a well-formed signature that does not match and an error
/// when the key or signature cannot be decoded.
pub fn verify_signature(
    message: &[u8],
    signature: &[u8],
    public_key: &ECPoint,
) -> CryptoResult<bool> {
    if signature.len() != 64 {
        return Err(CryptoError::InvalidSignature(format!(
            "expected 64 bytes, found {}",
            signature.len()
        )));
    }
    let sig = Signature::from_slice(signature)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    let verifying_key = VerifyingKey::from(public_key.to_public_key()?);

    match verifying_key.verify(message, &sig) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}

/// Builds the single-signature verification script `PUSHBYTES33 <key> CHECKSIG`.
pub fn create_signature_redeem_script(public_key: &ECPoint) -> Vec<u8> {
    let mut script = Vec::with_capacity(35);
    script.push(PUSHBYTES33);
    script.extend_from_slice(public_key.as_bytes());
    script.push(CHECKSIG);
    script
}

/// Script hash of the verification script for `public_key`.
pub fn verification_script_hash(public_key: &ECPoint) -> UInt160 {
    UInt160(hash160(&create_signature_redeem_script(public_key)))
}
