use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported schema version {found}, this build supports up to {supported}")]
    SchemaVersion { found: u32, supported: u32 },

    #[error("corrupted meta value: {0}")]
    Meta(String),
}

impl From<LmdbError> for ballot_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::SchemaVersion { .. } | LmdbError::Meta(_) => {
                ballot_store::StoreError::Corruption(e.to_string())
            }
            other => ballot_store::StoreError::Backend(other.to_string()),
        }
    }
}
