//! moviedb benchmark harness
//!
//! Drives the read-assembly procedures of `moviedb-core` against PostgreSQL
//! or SQLite and reports throughput and latency.
//!
//! - **config**: command line arguments and the validated run configuration
//! - **fixtures**: deterministic dataset generation at several scales
//! - **schema**: table creation and bulk population for both engines
//! - **harness**: concurrent workers and latency histograms
//! - **report**: text and JSON output

pub mod config;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod report;
pub mod schema;

pub use config::{Args, BenchConfig};
pub use error::{Error, Result};
pub use fixtures::{Dataset, Scale};
pub use harness::{
    run_backend, run_query, run_url, BenchmarkResults, LatencyStats, QueryResult, RunSettings,
};
