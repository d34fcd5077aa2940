use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("ledger error: {0}")]
    Ledger(#[from] ballot_ledger::LedgerError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] ballot_store_lmdb::LmdbError),

    #[error("config error: {0}")]
    Config(String),

    #[error("state lock poisoned")]
    LockPoisoned,
}
