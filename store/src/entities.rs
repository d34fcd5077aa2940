//! Typed access to elections, polls, vote markers and their derived indices.
//!
//! The underlying store has no range scans, so enumeration is served from
//! app-maintained index lists that are rewritten (read, append, write) on
//! every create. Dedicated keys hold the "latest" pointers.

use serde::de::DeserializeOwned;

use crate::records::{AppInfo, ElectionIndexEntry, ElectionRecord, PollIndexEntry, PollRecord};
use crate::{keys, KvStore, StoreError, WriteBatch};

const VOTE_MARKER: &[u8] = &[1];

/// Entity layer over any [`KvStore`].
pub struct EntityStore<S> {
    kv: S,
}

fn decode<T: DeserializeOwned>(key: &[u8], bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| {
        StoreError::Serialization(format!(
            "record at '{}': {}",
            String::from_utf8_lossy(key),
            e
        ))
    })
}

fn decode_utf8(key: &[u8], bytes: Vec<u8>) -> Result<String, StoreError> {
    String::from_utf8(bytes).map_err(|_| {
        StoreError::Corruption(format!(
            "pointer at '{}' is not utf-8",
            String::from_utf8_lossy(key)
        ))
    })
}

impl<S: KvStore> EntityStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    fn get_record<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>, StoreError> {
        match self.kv.get(key)? {
            Some(bytes) => decode(key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Read a value, preferring anything already staged in `batch`.
    fn get_record_staged<T: DeserializeOwned>(
        &self,
        batch: &WriteBatch,
        key: &[u8],
    ) -> Result<Option<T>, StoreError> {
        match batch.staged(key) {
            Some(bytes) => decode(key, bytes).map(Some),
            None => self.get_record(key),
        }
    }

    // ── Elections ───────────────────────────────────────────────────────

    pub fn election(&self, id: &str) -> Result<Option<ElectionRecord>, StoreError> {
        self.get_record(&keys::election(id))
    }

    pub fn election_exists(&self, id: &str) -> Result<bool, StoreError> {
        self.kv.exists(&keys::election(id))
    }

    pub fn latest_election_id(&self) -> Result<Option<String>, StoreError> {
        self.kv
            .get(keys::LATEST_ELECTION)?
            .map(|bytes| decode_utf8(keys::LATEST_ELECTION, bytes))
            .transpose()
    }

    /// Every election in commit order.
    pub fn election_index(&self) -> Result<Vec<ElectionIndexEntry>, StoreError> {
        Ok(self.get_record(keys::ELECTION_INDEX)?.unwrap_or_default())
    }

    /// Stage a new election: the record, the latest pointer and an index row.
    pub fn stage_election(
        &self,
        batch: &mut WriteBatch,
        record: &ElectionRecord,
    ) -> Result<(), StoreError> {
        let mut index: Vec<ElectionIndexEntry> = self
            .get_record_staged(batch, keys::ELECTION_INDEX)?
            .unwrap_or_default();
        index.push(ElectionIndexEntry {
            id: record.id.clone(),
            voter_count: record.voters.len() as u64,
        });

        batch.put_record(keys::election(&record.id), record)?;
        batch.put(keys::LATEST_ELECTION, record.id.as_bytes());
        batch.put_record(keys::ELECTION_INDEX, &index)?;
        Ok(())
    }

    // ── Polls ───────────────────────────────────────────────────────────

    pub fn poll(&self, hash: &str) -> Result<Option<PollRecord>, StoreError> {
        self.get_record(&keys::poll(hash))
    }

    pub fn poll_exists(&self, hash: &str) -> Result<bool, StoreError> {
        self.kv.exists(&keys::poll(hash))
    }

    pub fn latest_poll_hash(&self) -> Result<Option<String>, StoreError> {
        self.kv
            .get(keys::LATEST_POLL)?
            .map(|bytes| decode_utf8(keys::LATEST_POLL, bytes))
            .transpose()
    }

    /// Every poll in commit order.
    pub fn poll_index(&self) -> Result<Vec<PollIndexEntry>, StoreError> {
        Ok(self.get_record(keys::POLL_INDEX)?.unwrap_or_default())
    }

    /// Stage a new poll: the record, the latest pointer and an index row.
    pub fn stage_poll(&self, batch: &mut WriteBatch, record: &PollRecord) -> Result<(), StoreError> {
        let mut index: Vec<PollIndexEntry> = self
            .get_record_staged(batch, keys::POLL_INDEX)?
            .unwrap_or_default();
        index.push(PollIndexEntry {
            hash: record.hash.clone(),
        });

        batch.put_record(keys::poll(&record.hash), record)?;
        batch.put(keys::LATEST_POLL, record.hash.as_bytes());
        batch.put_record(keys::POLL_INDEX, &index)?;
        Ok(())
    }

    // ── Votes ───────────────────────────────────────────────────────────

    /// Whether `voter` ever voted on `poll_hash`, regardless of which poll is latest.
    pub fn has_voted(&self, voter: &str, poll_hash: &str) -> Result<bool, StoreError> {
        self.kv.exists(&keys::vote(voter, poll_hash))
    }

    /// Stage a vote: the idempotency marker plus the poll with its updated tally.
    pub fn stage_vote(
        &self,
        batch: &mut WriteBatch,
        voter: &str,
        updated_poll: &PollRecord,
    ) -> Result<(), StoreError> {
        batch.put(keys::vote(voter, &updated_poll.hash), VOTE_MARKER);
        batch.put_record(keys::poll(&updated_poll.hash), updated_poll)?;
        Ok(())
    }

    // ── Application info ────────────────────────────────────────────────

    /// Last persisted application info, zeroed for a fresh store.
    pub fn app_info(&self) -> Result<AppInfo, StoreError> {
        Ok(self.get_record(keys::APP_INFO)?.unwrap_or_default())
    }

    /// Application info including anything staged in `batch`.
    pub fn app_info_staged(&self, batch: &WriteBatch) -> Result<AppInfo, StoreError> {
        Ok(self
            .get_record_staged(batch, keys::APP_INFO)?
            .unwrap_or_default())
    }

    pub fn stage_app_info(&self, batch: &mut WriteBatch, info: &AppInfo) -> Result<(), StoreError> {
        batch.put_record(keys::APP_INFO, info)
    }

    /// Apply a staged batch atomically.
    pub fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        self.kv.write_batch(batch)
    }
}
