//! Harness configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use moviedb_core::{DatabaseKind, Operation, PoolConfig};

use crate::error::{Error, Result};
use crate::fixtures::Scale;
use crate::harness::RunSettings;

/// moviedb read-assembly benchmark command line arguments.
#[derive(Debug, Parser)]
#[command(name = "moviedb-bench")]
#[command(about = "Benchmark user, person and movie read procedures")]
pub struct Args {
    /// Database URL (postgres://... or sqlite:...). May be repeated.
    /// Defaults to the DATABASE_URL environment variable.
    #[arg(short = 'd', long = "database-url")]
    pub database_urls: Vec<String>,

    /// Number of concurrent workers per operation.
    #[arg(short = 'C', long, default_value_t = 10)]
    pub concurrency: usize,

    /// Warmup time in seconds before measuring.
    #[arg(long, default_value_t = 5)]
    pub warmup_time: u64,

    /// Measured duration in seconds per operation.
    #[arg(short = 'D', long, default_value_t = 30)]
    pub duration: u64,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 2)]
    pub timeout: u64,

    /// Operation to run (get_user, get_person, get_movie). May be repeated.
    /// Defaults to all operations.
    #[arg(short = 'q', long = "query")]
    pub queries: Vec<String>,

    /// Write the JSON report to this file.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Drop, recreate and seed the schema before running.
    #[arg(long)]
    pub setup: bool,

    /// Dataset size used with --setup.
    #[arg(long, value_enum, default_value_t = Scale::Small)]
    pub scale: Scale,

    /// Minimum number of pooled connections to maintain.
    #[arg(long, default_value_t = 1)]
    pub pool_min_connections: u32,

    /// Maximum number of pooled connections. Defaults to the concurrency.
    #[arg(long)]
    pub pool_max_connections: Option<u32>,

    /// Timeout (ms) when acquiring a pooled connection.
    #[arg(long, default_value_t = 30_000)]
    pub pool_acquire_timeout_ms: u64,
}

/// Validated harness configuration.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Databases to benchmark, in order.
    pub database_urls: Vec<String>,
    pub concurrency: usize,
    pub warmup_time: Duration,
    pub duration: Duration,
    pub timeout: Duration,
    pub operations: Vec<Operation>,
    pub json: Option<PathBuf>,
    /// Scale to seed with before running, if any.
    pub setup: Option<Scale>,
    pub pool_min_connections: u32,
    pub pool_max_connections: u32,
    pub pool_acquire_timeout: Duration,
}

impl BenchConfig {
    /// Timing parameters for the workers.
    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            concurrency: self.concurrency,
            warmup_time: self.warmup_time,
            duration: self.duration,
            timeout: self.timeout,
        }
    }

    /// Pool configuration for one database.
    pub fn pool_config(&self, url: &str) -> PoolConfig {
        PoolConfig::new(url)
            .with_min_connections(self.pool_min_connections)
            .with_max_connections(self.pool_max_connections)
            .with_acquire_timeout(self.pool_acquire_timeout)
    }
}

impl TryFrom<&Args> for BenchConfig {
    type Error = Error;

    fn try_from(args: &Args) -> Result<Self> {
        let database_urls = if args.database_urls.is_empty() {
            let url = std::env::var("DATABASE_URL").map_err(|_| {
                Error::Config("no --database-url given and DATABASE_URL is not set".into())
            })?;
            vec![url]
        } else {
            args.database_urls.clone()
        };
        for url in &database_urls {
            DatabaseKind::from_url(url)?;
        }

        let operations = if args.queries.is_empty() {
            Operation::ALL.to_vec()
        } else {
            args.queries
                .iter()
                .map(|name| name.parse::<Operation>())
                .collect::<moviedb_core::Result<Vec<_>>>()?
        };

        if args.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".into()));
        }
        if args.timeout == 0 {
            return Err(Error::Config("timeout must be at least 1 second".into()));
        }

        let pool_max_connections = args
            .pool_max_connections
            .unwrap_or(args.concurrency.try_into().unwrap_or(u32::MAX));
        let config = Self {
            database_urls,
            concurrency: args.concurrency,
            warmup_time: Duration::from_secs(args.warmup_time),
            duration: Duration::from_secs(args.duration),
            timeout: Duration::from_secs(args.timeout),
            operations,
            json: args.json.clone(),
            setup: args.setup.then_some(args.scale),
            pool_min_connections: args.pool_min_connections,
            pool_max_connections,
            pool_acquire_timeout: Duration::from_millis(args.pool_acquire_timeout_ms),
        };

        for url in &config.database_urls {
            config.pool_config(url).validate()?;
        }

        Ok(config)
    }
}
