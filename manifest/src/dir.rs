//! Directory-backed manifest source.
//!
//! Layout: `<root>/<hash>/<name>`. Listing `<hash>` yields one entry per
//! regular file, with child address `<hash>/<name>`, sorted by name.

use std::path::PathBuf;

use crate::{ManifestEntry, ManifestError, ManifestSource};

pub struct DirManifestStore {
    root: PathBuf,
}

fn is_plain_component(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\'])
}

impl DirManifestStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn folder(&self, hash: &str) -> Result<PathBuf, ManifestError> {
        if !is_plain_component(hash) {
            return Err(ManifestError::InvalidAddress(hash.to_string()));
        }
        Ok(self.root.join(hash))
    }
}

impl ManifestSource for DirManifestStore {
    fn list_entries(&self, hash: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
        let folder = self.folder(hash)?;
        let read_dir =
            std::fs::read_dir(&folder).map_err(|_| ManifestError::NotFound(hash.to_string()))?;

        let mut entries = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }
            let Ok(name) = dir_entry.file_name().into_string() else {
                continue;
            };
            entries.push(ManifestEntry {
                child_hash: format!("{hash}/{name}"),
                name,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn fetch(&self, child_hash: &str) -> Result<Vec<u8>, ManifestError> {
        let (hash, name) = child_hash
            .split_once('/')
            .filter(|(h, n)| is_plain_component(h) && is_plain_component(n))
            .ok_or_else(|| ManifestError::InvalidAddress(child_hash.to_string()))?;
        let path = self.folder(hash)?.join(name);
        std::fs::read(&path).map_err(|_| ManifestError::EntryNotFound(child_hash.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_poll_manifest;

    fn store_with_poll(body: &str) -> (tempfile::TempDir, DirManifestStore) {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("QmPoll");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join("poll.json"), body).unwrap();
        std::fs::write(folder.join("banner.txt"), "vote!").unwrap();
        let store = DirManifestStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn lists_files_sorted() {
        let (_dir, store) = store_with_poll("{}");
        let names: Vec<_> = store
            .list_entries("QmPoll")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["banner.txt", "poll.json"]);
    }

    #[test]
    fn loads_manifest_from_folder() {
        let (_dir, store) =
            store_with_poll(r#"{"description":"lunch","choices":{"pizza":"Pizza"}}"#);
        let manifest = load_poll_manifest(&store, "QmPoll").unwrap();
        assert_eq!(manifest.description, "lunch");
    }

    #[test]
    fn unknown_folder_is_not_found() {
        let (_dir, store) = store_with_poll("{}");
        assert!(matches!(
            store.list_entries("QmOther"),
            Err(ManifestError::NotFound(_))
        ));
    }

    #[test]
    fn traversal_is_refused() {
        let (_dir, store) = store_with_poll("{}");
        assert!(matches!(
            store.list_entries(".."),
            Err(ManifestError::InvalidAddress(_))
        ));
        assert!(matches!(
            store.fetch("QmPoll/../../etc"),
            Err(ManifestError::InvalidAddress(_))
        ));
    }
}
