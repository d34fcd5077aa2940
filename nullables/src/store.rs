//! Nullable store — thread-safe in-memory key/value storage for testing.

use ballot_store::{KvStore, StoreError, WriteBatch};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// An in-memory [`KvStore`]. A whole batch is applied under one lock, so
/// readers never see half of it.
pub struct NullStore {
    entries: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every key/value pair, in key order.
    pub fn dump(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for NullStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.entries.lock().unwrap().contains_key(key))
    }

    fn write_batch(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        for (key, value) in batch.into_puts() {
            entries.insert(key, value);
        }
        Ok(())
    }
}
