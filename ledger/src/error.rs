use ballot_store::StoreError;
use ballot_types::Rejection;
use thiserror::Error;

/// Faults inside the ledger that are never the submitter's doing.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("inconsistent state: {0}")]
    Inconsistent(String),
}

impl From<LedgerError> for Rejection {
    fn from(err: LedgerError) -> Self {
        Rejection::server(err.to_string())
    }
}

