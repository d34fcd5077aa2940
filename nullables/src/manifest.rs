//! Nullable manifest source — an in-memory content-addressed store.

use ballot_manifest::{ManifestEntry, ManifestError, ManifestSource, POLL_MANIFEST_NAME};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    folders: BTreeMap<String, Vec<ManifestEntry>>,
    blobs: BTreeMap<String, Vec<u8>>,
}

/// In-memory manifest source. Addresses are derived from content, so adding
/// the same folder twice yields the same address.
pub struct NullManifestStore {
    inner: Mutex<Inner>,
}

fn address(bytes: &[u8]) -> String {
    format!("bf{}", hex::encode(&ballot_crypto::blake2b_256(bytes)[..16]))
}

impl NullManifestStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Store a folder of named files and return its address.
    pub fn add_folder(&self, files: &[(&str, &[u8])]) -> String {
        let mut inner = self.inner.lock().unwrap();
        let mut entries = Vec::with_capacity(files.len());
        let mut folder_digest = Vec::new();
        for (name, bytes) in files {
            let child = address(bytes);
            inner.blobs.insert(child.clone(), bytes.to_vec());
            folder_digest.extend_from_slice(name.as_bytes());
            folder_digest.push(0);
            folder_digest.extend_from_slice(child.as_bytes());
            folder_digest.push(0);
            entries.push(ManifestEntry {
                name: name.to_string(),
                child_hash: child,
            });
        }
        let hash = address(&folder_digest);
        inner.folders.insert(hash.clone(), entries);
        hash
    }

    /// Store a folder holding a single `poll.json` and return its address.
    pub fn add_poll(&self, description: &str, labels: &[&str]) -> String {
        let choices: BTreeMap<&str, String> = labels
            .iter()
            .map(|l| (*l, l.to_uppercase()))
            .collect();
        let body = serde_json::json!({ "description": description, "choices": choices });
        let bytes = serde_json::to_vec(&body).unwrap();
        self.add_folder(&[(POLL_MANIFEST_NAME, bytes.as_slice())])
    }
}

impl Default for NullManifestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestSource for NullManifestStore {
    fn list_entries(&self, hash: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
        self.inner
            .lock()
            .unwrap()
            .folders
            .get(hash)
            .cloned()
            .ok_or_else(|| ManifestError::NotFound(hash.to_string()))
    }

    fn fetch(&self, child_hash: &str) -> Result<Vec<u8>, ManifestError> {
        self.inner
            .lock()
            .unwrap()
            .blobs
            .get(child_hash)
            .cloned()
            .ok_or_else(|| ManifestError::EntryNotFound(child_hash.to_string()))
    }
}
