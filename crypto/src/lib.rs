//! Cryptographic primitives for the ballot ledger.
//!
//! - **Ed25519** for signing and signature verification
//! - **Blake2b** for the rolling application hash
//! - Hex codecs for public keys and signatures as they appear on the wire

pub mod encoding;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use encoding::{decode_public_key_hex, decode_signature_hex};
pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
