//! Benchmark runner.
//!
//! For each operation, `concurrency` tasks loop over random ids for the
//! warmup period, then for the measured period while recording every
//! request latency into a histogram of 10 microsecond buckets.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moviedb_core::{
    bench_query, load_ids, Backend, DatabaseKind, EntityIds, Operation, PostgresBackend,
    SqliteBackend,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tokio::task::JoinSet;

use crate::config::BenchConfig;
use crate::error::{Error, Result};
use crate::fixtures::Dataset;
use crate::schema;

/// Latency histogram resolution.
pub const BUCKET: Duration = Duration::from_micros(10);

/// Buckets per second of request timeout.
const BUCKETS_PER_SEC: u64 = 100_000;

/// Timing parameters shared by every worker.
#[derive(Debug, Clone, Copy)]
pub struct RunSettings {
    pub concurrency: usize,
    pub warmup_time: Duration,
    pub duration: Duration,
    pub timeout: Duration,
}

impl RunSettings {
    /// Histogram length: one bucket per 10us up to the timeout, plus one
    /// overflow bucket.
    pub fn histogram_len(&self) -> usize {
        let secs = self.timeout.as_secs() + u64::from(self.timeout.subsec_nanos() > 0);
        (secs * BUCKETS_PER_SEC + 1) as usize
    }
}

/// Latency measurements of one worker or one aggregated run.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyStats {
    pub nqueries: u64,
    /// In units of [`BUCKET`]; 0 when no query completed.
    pub min_latency: u64,
    /// In units of [`BUCKET`].
    pub max_latency: u64,
    pub histogram: Vec<u64>,
}

impl LatencyStats {
    pub fn new(buckets: usize) -> Self {
        Self {
            nqueries: 0,
            min_latency: 0,
            max_latency: 0,
            histogram: vec![0; buckets],
        }
    }

    /// Record one request latency.
    pub fn record(&mut self, elapsed: Duration) {
        let ticks = (elapsed.as_nanos() / BUCKET.as_nanos()) as u64;

        if self.nqueries == 0 || ticks < self.min_latency {
            self.min_latency = ticks;
        }
        if ticks > self.max_latency {
            self.max_latency = ticks;
        }

        let last = self.histogram.len().saturating_sub(1);
        let bucket = (ticks as usize).min(last);
        if let Some(count) = self.histogram.get_mut(bucket) {
            *count += 1;
        }
        self.nqueries += 1;
    }

    /// Fold another set of measurements into this one.
    pub fn merge(&mut self, other: &LatencyStats) {
        if other.nqueries > 0 && (self.nqueries == 0 || other.min_latency < self.min_latency) {
            self.min_latency = other.min_latency;
        }
        self.max_latency = self.max_latency.max(other.max_latency);
        if self.histogram.len() < other.histogram.len() {
            self.histogram.resize(other.histogram.len(), 0);
        }
        for (total, count) in self.histogram.iter_mut().zip(&other.histogram) {
            *total += count;
        }
        self.nqueries += other.nqueries;
    }
}

/// Aggregated result of one operation against one backend.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub benchmark: String,
    pub operation: Operation,
    pub duration: Duration,
    pub stats: LatencyStats,
}

impl QueryResult {
    /// Completed queries per second over the measured period.
    pub fn qps(&self) -> u64 {
        let secs = self.duration.as_secs().max(1);
        self.stats.nqueries / secs
    }
}

/// All query results for one backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResults {
    pub benchmark: String,
    pub duration: Duration,
    pub queries: Vec<QueryResult>,
}

/// Run one request with the configured deadline.
///
/// On timeout the request future is dropped, which rolls back its
/// transaction and returns its connection to the pool.
async fn timed_request<B>(backend: &B, operation: Operation, id: i64, timeout: Duration) -> Result<()>
where
    B: Backend + ?Sized,
{
    match tokio::time::timeout(timeout, bench_query(backend, operation, id)).await {
        Ok(result) => {
            result?;
            Ok(())
        }
        Err(_) => Err(moviedb_core::Error::Timeout(timeout).into()),
    }
}

async fn run_worker<B>(
    backend: Arc<B>,
    ids: Arc<Vec<i64>>,
    operation: Operation,
    settings: RunSettings,
) -> Result<LatencyStats>
where
    B: Backend + 'static,
{
    let mut rng = StdRng::from_entropy();
    let mut stats = LatencyStats::new(settings.histogram_len());

    let start = Instant::now();
    while start.elapsed() < settings.warmup_time {
        let id = *ids.choose(&mut rng).ok_or(Error::NoIds(operation))?;
        timed_request(backend.as_ref(), operation, id, settings.timeout).await?;
    }

    let start = Instant::now();
    while start.elapsed() < settings.duration {
        let id = *ids.choose(&mut rng).ok_or(Error::NoIds(operation))?;
        let request_start = Instant::now();
        timed_request(backend.as_ref(), operation, id, settings.timeout).await?;
        stats.record(request_start.elapsed());
    }

    Ok(stats)
}

/// Merge worker results as they finish.
///
/// The first failing worker aborts all remaining workers.
async fn collect_workers(
    mut workers: JoinSet<Result<LatencyStats>>,
    buckets: usize,
) -> Result<LatencyStats> {
    let mut stats = LatencyStats::new(buckets);
    while let Some(joined) = workers.join_next().await {
        let outcome = joined
            .map_err(|e| Error::Worker(e.to_string()))
            .and_then(|worker| worker);
        match outcome {
            Ok(worker) => stats.merge(&worker),
            Err(err) => {
                workers.abort_all();
                return Err(err);
            }
        }
    }
    Ok(stats)
}

/// Benchmark one operation with `settings.concurrency` workers.
pub async fn run_query<B>(
    backend: Arc<B>,
    ids: &EntityIds,
    operation: Operation,
    settings: RunSettings,
) -> Result<QueryResult>
where
    B: Backend + 'static,
{
    let op_ids = Arc::new(ids.get(operation).to_vec());
    if op_ids.is_empty() {
        return Err(Error::NoIds(operation));
    }

    tracing::info!(
        backend = backend.name(),
        %operation,
        concurrency = settings.concurrency,
        ids = op_ids.len(),
        "running benchmark"
    );

    let mut workers = JoinSet::new();
    for _ in 0..settings.concurrency {
        workers.spawn(run_worker(
            backend.clone(),
            op_ids.clone(),
            operation,
            settings,
        ));
    }
    let stats = collect_workers(workers, settings.histogram_len()).await?;

    Ok(QueryResult {
        benchmark: backend.name().to_string(),
        operation,
        duration: settings.duration,
        stats,
    })
}

/// Run every configured operation against one backend.
pub async fn run_backend<B>(backend: Arc<B>, config: &BenchConfig) -> Result<BenchmarkResults>
where
    B: Backend + 'static,
{
    let ids = load_ids(backend.as_ref()).await?;
    let settings = config.run_settings();

    let mut queries = Vec::with_capacity(config.operations.len());
    for &operation in &config.operations {
        let result = run_query(backend.clone(), &ids, operation, settings).await?;
        crate::report::print_result(&result);
        queries.push(result);
    }

    Ok(BenchmarkResults {
        benchmark: backend.name().to_string(),
        duration: settings.duration,
        queries,
    })
}

/// Connect to `url`, optionally create and seed the schema, and run every
/// configured operation.
pub async fn run_url(url: &str, config: &BenchConfig) -> Result<BenchmarkResults> {
    let pool_config = config.pool_config(url);

    let results = match DatabaseKind::from_url(url)? {
        DatabaseKind::Postgres => {
            let backend = Arc::new(PostgresBackend::connect(&pool_config).await?);
            if let Some(scale) = config.setup {
                schema::setup_postgres(backend.pool()).await?;
                schema::populate_postgres(backend.pool(), &Dataset::generate(scale)).await?;
            }
            let results = run_backend(backend.clone(), config).await;
            backend.close().await;
            results?
        }
        DatabaseKind::Sqlite => {
            let backend = Arc::new(SqliteBackend::connect(&pool_config).await?);
            if let Some(scale) = config.setup {
                schema::setup_sqlite(backend.pool()).await?;
                schema::populate_sqlite(backend.pool(), &Dataset::generate(scale)).await?;
            }
            let results = run_backend(backend.clone(), config).await;
            backend.close().await;
            results?
        }
    };

    Ok(results)
}
