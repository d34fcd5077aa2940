use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("folder {0} could not be listed")]
    NotFound(String),

    #[error("folder {0} has no poll.json entry")]
    MissingPollJson(String),

    #[error("entry {0} could not be fetched")]
    EntryNotFound(String),

    #[error("invalid content address: {0}")]
    InvalidAddress(String),

    #[error("poll.json is not valid JSON: {0}")]
    Json(String),

    #[error("poll.json has an empty description")]
    EmptyDescription,

    #[error("poll.json has no choices")]
    EmptyChoices,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
