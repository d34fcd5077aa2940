//! LMDB storage backend for the ballot ledger.
//!
//! Implements [`ballot_store::KvStore`] with the `heed` LMDB bindings. All
//! entity keys live in one `entities` database; a separate `meta` database
//! holds the schema version.

pub mod environment;
pub mod error;
pub mod meta;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
