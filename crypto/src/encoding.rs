//! Hex codecs for keys and signatures as carried in envelopes.

use ballot_types::{PublicKey, Signature};
use ed25519_dalek::VerifyingKey;

use crate::CryptoError;

/// Decode a hex string into a public key, checking that the bytes form a
/// valid Ed25519 curve point.
pub fn decode_public_key_hex(s: &str) -> Result<PublicKey, CryptoError> {
    let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
    let arr: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::PublicKeyLength(bytes.len()))?;
    VerifyingKey::from_bytes(&arr).map_err(|_| CryptoError::InvalidPublicKey)?;
    Ok(PublicKey(arr))
}

/// Decode a hex string into a 64-byte signature blob.
///
/// Only the shape is checked here; whether the signature verifies is up to
/// [`crate::verify_signature`].
pub fn decode_signature_hex(s: &str) -> Result<Signature, CryptoError> {
    let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
    let arr: [u8; 64] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::SignatureLength(bytes.len()))?;
    Ok(Signature(arr))
}
