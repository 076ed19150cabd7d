//! moviedb core: read-assembly procedures over the movie review schema.
//!
//! Each procedure loads a root entity by id, fetches its ordered, bounded
//! relations and assembles one nested, JSON-serializable record.
//!
//! # Operations
//!
//! - **get_user**: a user with their 10 newest reviews (single statement)
//! - **get_person**: a person with acted-in and directed movies
//! - **get_movie**: a movie with directors, cast and reviews
//!
//! Multi-statement procedures run inside one REPEATABLE READ transaction
//! so every relation is read from the same snapshot as the root row.
//!
//! # Quick Start
//!
//! ```ignore
//! use moviedb_core::{bench_query, Operation, PoolConfig, PostgresBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = PostgresBackend::connect(&PoolConfig::new("postgres://localhost/moviedb")).await?;
//!     let json = bench_query(&backend, Operation::GetMovie, 42).await?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```

pub mod assemble;
pub mod backends;
pub mod config;
pub mod error;
pub mod model;
pub mod operation;
pub mod procedures;
pub mod rows;
pub mod sampler;
pub mod session;

pub use backends::{PostgresBackend, SqliteBackend};
pub use config::{DatabaseKind, PoolConfig};
pub use error::{Error, Result};
pub use operation::Operation;
pub use procedures::{
    bench_query, bench_query_named, movie_details, person_details, run, user_details, Details,
};
pub use sampler::{load_ids, EntityIds};
pub use session::{with_snapshot, Backend, IsolationLevel, Session, TransactionSession};
