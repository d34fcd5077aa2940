//! Nullable infrastructure for deterministic testing.
//!
//! The state machine's external dependencies (key/value store, manifest
//! source) sit behind traits. This crate provides in-memory implementations
//! that:
//! - Behave deterministically
//! - Can be seeded and inspected programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod manifest;
pub mod store;

pub use manifest::NullManifestStore;
pub use store::NullStore;
