//! The interface consumed from the content-addressed document store.

use std::sync::Arc;

use crate::ManifestError;

/// One named entry of a content-addressed folder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub child_hash: String,
}

/// Read access to a content-addressed store.
///
/// Implementations must be deterministic: the same address yields the same
/// entries and bytes (or the same failure) on every replica.
pub trait ManifestSource: Send + Sync {
    /// List the entries of the folder at `hash`.
    fn list_entries(&self, hash: &str) -> Result<Vec<ManifestEntry>, ManifestError>;

    /// Fetch the bytes of an entry by its child address.
    fn fetch(&self, child_hash: &str) -> Result<Vec<u8>, ManifestError>;
}

impl<M: ManifestSource + ?Sized> ManifestSource for Arc<M> {
    fn list_entries(&self, hash: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
        (**self).list_entries(hash)
    }

    fn fetch(&self, child_hash: &str) -> Result<Vec<u8>, ManifestError> {
        (**self).fetch(child_hash)
    }
}
