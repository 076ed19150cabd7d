//! Harness error types.

use moviedb_core::Operation;
use thiserror::Error;

/// Benchmark harness errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A read procedure failed.
    #[error(transparent)]
    Core(#[from] moviedb_core::Error),

    /// Schema setup or population failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The dataset has no ids for an operation being benchmarked.
    #[error("no ids available for {0}")]
    NoIds(Operation),

    /// A worker task panicked or was aborted.
    #[error("worker failed: {0}")]
    Worker(String),

    /// Invalid command line or configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Report encoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for harness operations.
pub type Result<T> = std::result::Result<T, Error>;
