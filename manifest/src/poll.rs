//! The `poll.json` document.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::{ManifestError, ManifestSource};

/// Name of the manifest entry inside a poll folder.
pub const POLL_MANIFEST_NAME: &str = "poll.json";

/// Parsed `poll.json`. Choice labels map to their display strings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PollManifest {
    #[serde(alias = "Description")]
    pub description: String,
    #[serde(alias = "Choices")]
    pub choices: BTreeMap<String, String>,
}

impl PollManifest {
    /// Parse and check that description and choices are non-empty.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ManifestError> {
        let manifest: PollManifest =
            serde_json::from_slice(bytes).map_err(|e| ManifestError::Json(e.to_string()))?;
        if manifest.description.is_empty() {
            return Err(ManifestError::EmptyDescription);
        }
        if manifest.choices.is_empty() {
            return Err(ManifestError::EmptyChoices);
        }
        Ok(manifest)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.choices.keys().map(String::as_str)
    }
}

/// Locate `poll.json` in the folder at `poll_hash`, fetch and parse it.
pub fn load_poll_manifest<M: ManifestSource + ?Sized>(
    source: &M,
    poll_hash: &str,
) -> Result<PollManifest, ManifestError> {
    let entries = source.list_entries(poll_hash)?;
    let entry = entries
        .iter()
        .find(|e| e.name == POLL_MANIFEST_NAME)
        .ok_or_else(|| ManifestError::MissingPollJson(poll_hash.to_string()))?;
    let bytes = source.fetch(&entry.child_hash)?;
    let manifest = PollManifest::from_json(&bytes)?;
    tracing::debug!(
        poll_hash,
        choices = manifest.choices.len(),
        "loaded poll manifest"
    );
    Ok(manifest)
}
