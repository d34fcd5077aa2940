//! Write batching: stage every put of one transaction, then apply them in a
//! single backend write.
//!
//! ```ignore
//! let mut batch = WriteBatch::new();
//! batch.put_record(&keys::poll(&record.hash), &record)?;
//! batch.put(keys::LATEST_POLL, record.hash.as_bytes());
//! store.write_batch(batch)?;
//! ```
//!
//! A batch that is dropped without being written has no effect.

use serde::Serialize;

use crate::StoreError;

/// Ordered list of puts. Later puts to the same key win.
#[derive(Debug, Default)]
pub struct WriteBatch {
    puts: Vec<(Vec<u8>, Vec<u8>)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage raw bytes at `key`.
    pub fn put(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.puts.push((key.into(), value.into()));
    }

    /// Stage a bincode-encoded record at `key`.
    pub fn put_record<T: Serialize>(
        &mut self,
        key: impl Into<Vec<u8>>,
        record: &T,
    ) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record)?;
        self.put(key, bytes);
        Ok(())
    }

    /// The most recently staged value for `key`, if any.
    pub fn staged(&self, key: &[u8]) -> Option<&[u8]> {
        self.puts
            .iter()
            .rev()
            .find(|(k, _)| k.as_slice() == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.puts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puts.is_empty()
    }

    pub fn into_puts(self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.puts
    }
}
