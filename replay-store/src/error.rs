use thiserror::Error;

/// Errors from opening, writing to, or reading from a [`crate::ReplayStore`].
#[derive(Debug, Error)]
pub enum ReplayStoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("replay buffer is empty; nothing to sample")]
    Empty,
}
