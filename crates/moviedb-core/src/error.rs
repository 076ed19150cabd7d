//! Core error types.

use std::time::Duration;

use thiserror::Error;

/// Read-assembly errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The root id did not match any row.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity type of the root lookup.
        entity: &'static str,
        /// Requested primary key.
        id: i64,
    },

    /// Driver or statement failure.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// No pooled connection became available in time.
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// The dispatcher received an operation name it does not know.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The call was cancelled after exceeding its deadline.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// JSON encoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether retrying the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::PoolExhausted | Error::Timeout(_))
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => Error::PoolExhausted,
            other => Error::Database(other),
        }
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
