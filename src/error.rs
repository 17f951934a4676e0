//! Error types for the HTTP and storage layers.
//!
//! Pipelines downgrade both to "no data for this item"; only failures of the
//! run itself surface through `anyhow` at the command boundary.

use thiserror::Error;

/// Outcome of a failed fetch once the retry policy has been applied.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The remote reported the resource as missing; never retried.
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Every attempt failed with a transport error or non-success status.
    #[error("giving up on {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        last: String,
    },

    /// The HTTP client could not be constructed.
    #[error("http client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias for the SQLite layer.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("file operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
