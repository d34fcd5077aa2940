//! Storage abstraction for the ballot ledger.
//!
//! Backends (LMDB, in-memory for testing) implement [`KvStore`]: point reads
//! plus an atomic write batch, with no range scans. Everything above that
//! (record encoding, "latest" pointers, enumeration indices) lives in
//! [`EntityStore`] so every backend shares one key layout.

pub mod batch;
pub mod entities;
pub mod error;
pub mod keys;
pub mod kv;
pub mod records;

pub use batch::WriteBatch;
pub use entities::EntityStore;
pub use error::StoreError;
pub use kv::KvStore;
pub use records::{AppInfo, ElectionIndexEntry, ElectionRecord, PollIndexEntry, PollRecord};
