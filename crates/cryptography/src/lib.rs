//! Cryptographic primitives for the Neo legacy script engine.
//!
//! Hashes (`sha1`, `sha256`, `ripemd160`, `hash160`, `hash256`), the [`ECPoint`]
//! public key type and secp256r1 signature verification.

pub mod ecc;
pub mod ecdsa;
pub mod error;
pub mod hash;

pub use ecc::ECPoint;
pub use ecdsa::{create_signature_redeem_script, verification_script_hash, verify_signature};
pub use error::{CryptoError, CryptoResult};
pub use hash::{hash160, hash256, ripemd160, sha1, sha256};
