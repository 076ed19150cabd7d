//! PostgreSQL backend.
//!
//! Snapshot reads use `REPEATABLE READ READ ONLY` transactions.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool, Postgres};

use crate::config::PoolConfig;
use crate::error::Result;
use crate::session::{Backend, IsolationLevel, TransactionSession};

/// Session over a PostgreSQL connection handle.
pub struct PgSession<C> {
    conn: C,
}

/// Session over a plain pooled connection.
pub type PgPooledSession = PgSession<PoolConnection<Postgres>>;

/// Session inside an open transaction.
pub type PgTransaction = PgSession<sqlx::Transaction<'static, Postgres>>;

impl_session!(PgSession, PgConnection);

#[async_trait]
impl TransactionSession for PgTransaction {
    async fn commit(self) -> Result<()> {
        Ok(self.conn.commit().await?)
    }

    async fn rollback(self) -> Result<()> {
        Ok(self.conn.rollback().await?)
    }
}

/// PostgreSQL backend.
#[derive(Debug, Clone)]
pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    /// Connect a new pool.
    pub async fn connect(config: &PoolConfig) -> Result<Self> {
        config.validate()?;

        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect(&config.url)
            .await?;

        tracing::info!(
            backend = "postgres",
            max_connections = config.max_connections,
            "connection pool ready"
        );

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Backend for PostgresBackend {
    type Connection = PgPooledSession;
    type Transaction = PgTransaction;

    fn name(&self) -> &str {
        "postgres"
    }

    async fn acquire(&self) -> Result<PgPooledSession> {
        let conn = self.pool.acquire().await?;
        Ok(PgSession { conn })
    }

    async fn begin(&self, isolation: IsolationLevel) -> Result<PgTransaction> {
        let mut tx = self.pool.begin().await?;
        // Must be the first statement of the transaction.
        let set_isolation = format!(
            "SET TRANSACTION ISOLATION LEVEL {} READ ONLY",
            isolation.as_sql()
        );
        sqlx::query(&set_isolation).execute(&mut *tx).await?;
        Ok(PgSession { conn: tx })
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
