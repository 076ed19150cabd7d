//! SQLite backend.
//!
//! The database is opened in WAL mode so readers do not block each other.
//! SQLite transactions are serializable; a deferred `BEGIN` pins the read
//! snapshot at the first statement, which covers every isolation level the
//! procedures ask for.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use crate::config::PoolConfig;
use crate::error::Result;
use crate::session::{Backend, IsolationLevel, TransactionSession};

/// Session over an SQLite connection handle.
pub struct SqliteSession<C> {
    conn: C,
}

/// Session over a plain pooled connection.
pub type SqlitePooledSession = SqliteSession<PoolConnection<Sqlite>>;

/// Session inside an open transaction.
pub type SqliteTransaction = SqliteSession<sqlx::Transaction<'static, Sqlite>>;

impl_session!(SqliteSession, SqliteConnection);

#[async_trait]
impl TransactionSession for SqliteTransaction {
    async fn commit(self) -> Result<()> {
        Ok(self.conn.commit().await?)
    }

    async fn rollback(self) -> Result<()> {
        Ok(self.conn.rollback().await?)
    }
}

/// SQLite backend.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Open (creating if missing) the database file named by the config URL.
    pub async fn connect(config: &PoolConfig) -> Result<Self> {
        config.validate()?;

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.acquire_timeout);

        let pool = SqlitePoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(options)
            .await?;

        tracing::info!(
            backend = "sqlite",
            url = %config.url,
            max_connections = config.max_connections,
            "connection pool ready"
        );

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    type Connection = SqlitePooledSession;
    type Transaction = SqliteTransaction;

    fn name(&self) -> &str {
        "sqlite"
    }

    async fn acquire(&self) -> Result<SqlitePooledSession> {
        let conn = self.pool.acquire().await?;
        Ok(SqliteSession { conn })
    }

    async fn begin(&self, isolation: IsolationLevel) -> Result<SqliteTransaction> {
        tracing::trace!(isolation = isolation.as_sql(), "begin deferred transaction");
        let tx = self.pool.begin().await?;
        Ok(SqliteSession { conn: tx })
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
