use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("not valid hex: {0}")]
    InvalidHex(String),

    #[error("public key must be 32 bytes, got {0}")]
    PublicKeyLength(usize),

    #[error("bytes are not a valid Ed25519 public key")]
    InvalidPublicKey,

    #[error("signature must be 64 bytes, got {0}")]
    SignatureLength(usize),
}
