//! Fundamental types for the ballot ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! key material newtypes and the response codes reported to the consensus engine.

pub mod code;
pub mod keys;
pub mod outcome;

pub use code::ResponseCode;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use outcome::Rejection;
