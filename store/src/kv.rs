//! The byte-key/byte-value store every backend implements.

use std::sync::Arc;

use crate::{StoreError, WriteBatch};

/// A namespaced key/value store with point lookups only.
///
/// `write_batch` must apply all puts of the batch atomically: a reader sees
/// either none of them or all of them.
pub trait KvStore: Send + Sync {
    /// Fetch the value stored at `key`, if any.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Whether a value is stored at `key`.
    fn exists(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }

    /// Apply every put in `batch`, in order, as one atomic write.
    fn write_batch(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, StoreError> {
        (**self).exists(key)
    }

    fn write_batch(&self, batch: WriteBatch) -> Result<(), StoreError> {
        (**self).write_batch(batch)
    }
}
