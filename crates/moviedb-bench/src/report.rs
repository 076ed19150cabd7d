//! Text and JSON result reporting.

use std::path::Path;

use serde::Serialize;

use crate::config::BenchConfig;
use crate::error::Result;
use crate::harness::{BenchmarkResults, QueryResult};

/// Latency histogram units per millisecond.
const UNITS_PER_MS: f64 = 100.0;

/// Render the run header printed before any benchmark starts.
pub fn format_header(config: &BenchConfig) -> String {
    let queries: Vec<&str> = config.operations.iter().map(|op| op.as_str()).collect();

    format!(
        "============ Rust ============\n\
         concurrency:\t{}\n\
         warmup time:\t{} seconds\n\
         duration:\t{} seconds\n\
         queries:\t{}\n",
        config.concurrency,
        config.warmup_time.as_secs(),
        config.duration.as_secs(),
        queries.join(", ")
    )
}

/// Render one query result in the text report format.
pub fn format_result(result: &QueryResult) -> String {
    format!(
        "== {} : {} ==\n\
         queries:\t{}\n\
         qps:\t\t{} q/s\n\
         min latency:\t{:.2}ms\n\
         max latency:\t{:.2}ms\n",
        result.benchmark,
        result.operation,
        result.stats.nqueries,
        result.qps(),
        result.stats.min_latency as f64 / UNITS_PER_MS,
        result.stats.max_latency as f64 / UNITS_PER_MS
    )
}

pub fn print_result(result: &QueryResult) {
    println!("{}", format_result(result));
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub language: &'static str,
    pub concurrency: usize,
    pub warmup_time: u64,
    pub duration: u64,
    pub data: Vec<BenchmarkReport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct BenchmarkReport<'a> {
    pub benchmark: &'a str,
    pub duration: u64,
    pub queries: Vec<QueryReport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct QueryReport<'a> {
    pub queryname: &'static str,
    pub nqueries: u64,
    pub min_latency: u64,
    pub max_latency: u64,
    pub latency_stats: &'a [u64],
}

impl<'a> Report<'a> {
    pub fn new(config: &BenchConfig, results: &'a [BenchmarkResults]) -> Self {
        let data = results
            .iter()
            .map(|bench| BenchmarkReport {
                benchmark: &bench.benchmark,
                duration: bench.duration.as_secs(),
                queries: bench
                    .queries
                    .iter()
                    .map(|query| QueryReport {
                        queryname: query.operation.as_str(),
                        nqueries: query.stats.nqueries,
                        min_latency: query.stats.min_latency,
                        max_latency: query.stats.max_latency,
                        latency_stats: &query.stats.histogram,
                    })
                    .collect(),
            })
            .collect();

        Self {
            language: "rust",
            concurrency: config.concurrency,
            warmup_time: config.warmup_time.as_secs(),
            duration: config.duration.as_secs(),
            data,
        }
    }
}

/// Write the JSON report for every benchmarked backend to `path`.
pub fn write_json(path: &Path, config: &BenchConfig, results: &[BenchmarkResults]) -> Result<()> {
    let report = Report::new(config, results);
    std::fs::write(path, serde_json::to_string(&report)?)?;
    tracing::info!(path = %path.display(), "json report written");
    Ok(())
}
