//! Poll manifests and the content-addressed store that hosts them.
//!
//! A poll is identified by the content address of a folder. The folder must
//! contain a `poll.json` entry describing the poll and its choice labels.
//! Every replica fetches the same address, so the fetch is part of the
//! deterministic input of a transaction.

pub mod dir;
pub mod error;
pub mod poll;
pub mod source;

pub use dir::DirManifestStore;
pub use error::ManifestError;
pub use poll::{load_poll_manifest, PollManifest, POLL_MANIFEST_NAME};
pub use source::{ManifestEntry, ManifestSource};
