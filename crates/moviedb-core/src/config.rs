//! Connection pool configuration.

use std::time::Duration;

use crate::error::{Error, Result};

/// Default maximum number of pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default timeout for checking a connection out of the pool.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default idle timeout after which unused connections are closed.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Database engine selected by a connection URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    Postgres,
    Sqlite,
}

impl DatabaseKind {
    /// Detect the engine from a connection URL scheme.
    pub fn from_url(url: &str) -> Result<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(DatabaseKind::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(DatabaseKind::Sqlite)
        } else {
            Err(Error::Config(format!("unsupported database url: {}", url)))
        }
    }
}

/// Configuration for the connection pool backing a backend.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Connection URL.
    pub url: String,
    /// Minimum number of connections to maintain.
    pub min_connections: u32,
    /// Maximum number of connections allowed.
    pub max_connections: u32,
    /// Timeout for acquiring a connection from the pool.
    pub acquire_timeout: Duration,
    /// Idle timeout after which unused connections are closed.
    pub idle_timeout: Duration,
}

impl PoolConfig {
    /// Create a new pool configuration.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            min_connections: 1,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Set the minimum connections.
    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Set the maximum connections.
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the acquire timeout.
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Set the idle timeout.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Engine selected by the configured URL.
    pub fn kind(&self) -> Result<DatabaseKind> {
        DatabaseKind::from_url(&self.url)
    }

    /// Check the pool bounds.
    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(Error::Config("max_connections must be at least 1".into()));
        }
        if self.min_connections > self.max_connections {
            return Err(Error::Config(
                "min_connections cannot exceed max_connections".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_builder() {
        let config = PoolConfig::new("postgres://localhost/moviedb")
            .with_min_connections(2)
            .with_max_connections(20)
            .with_acquire_timeout(Duration::from_secs(60));

        assert_eq!(config.min_connections, 2);
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.acquire_timeout, Duration::from_secs(60));
        assert_eq!(config.idle_timeout, DEFAULT_IDLE_TIMEOUT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_above_max_is_rejected() {
        let config = PoolConfig::new("sqlite::memory:")
            .with_min_connections(5)
            .with_max_connections(2);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_kind_from_url() {
        assert_eq!(
            DatabaseKind::from_url("postgresql://u@h/db").unwrap(),
            DatabaseKind::Postgres
        );
        assert_eq!(
            DatabaseKind::from_url("sqlite:///tmp/movies.db").unwrap(),
            DatabaseKind::Sqlite
        );
        assert!(DatabaseKind::from_url("mysql://localhost").is_err());
    }
}
