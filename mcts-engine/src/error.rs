use thiserror::Error;

/// The error taxonomy for the search engine.
///
/// `Terminal` (a rollout reached a terminal state) and `Cancelled` (a clean abort of a
/// `run`/`stop` in flight) are deliberately absent here: both are expected, successful
/// outcomes, never failures, and are represented as plain control-flow values instead of
/// `Err` — a terminal rollout never leaves the worker loop as an error, and a cancelled
/// `run` simply returns early from `TreeSearch::stop`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("not ready: {0}")]
    NotReady(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("fatal engine error: {0}")]
    Fatal(String),
}
