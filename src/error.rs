use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Rejected at session start, before any test state exists.
    #[error("invalid session config: {0}")]
    InvalidConfig(String),

    /// Statistics were requested for a user with no completed sessions.
    #[error("no completed sessions on record")]
    EmptyHistory,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
