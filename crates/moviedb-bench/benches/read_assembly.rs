//! Read procedure benchmarks.
//!
//! Runs each operation against a seeded SQLite file. Set `DATABASE_URL` to
//! a PostgreSQL URL to benchmark an already populated server as well.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use moviedb_bench::fixtures::{Dataset, Scale};
use moviedb_bench::schema;
use moviedb_core::{
    bench_query, load_ids, Backend, EntityIds, Operation, PoolConfig, PostgresBackend,
    SqliteBackend,
};
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn bench_operations<B: Backend>(c: &mut Criterion, rt: &Runtime, backend: &B, ids: &EntityIds) {
    let mut group = c.benchmark_group(format!("read_assembly/{}", backend.name()));
    group.measurement_time(Duration::from_secs(10));

    for operation in Operation::ALL {
        let op_ids = ids.get(operation);
        if op_ids.is_empty() {
            continue;
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(operation),
            &operation,
            |b, &operation| {
                let mut next = op_ids.iter().cycle();
                b.to_async(rt).iter(|| {
                    let id = *next.next().unwrap();
                    async move {
                        let json = bench_query(backend, operation, id).await.unwrap();
                        black_box(json)
                    }
                })
            },
        );
    }

    group.finish();
}

fn bench_sqlite(c: &mut Criterion) {
    let rt = runtime();
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("movies.db").display());

    let (backend, ids) = rt.block_on(async {
        let backend = SqliteBackend::connect(&PoolConfig::new(url)).await.unwrap();
        schema::setup_sqlite(backend.pool()).await.unwrap();
        schema::populate_sqlite(backend.pool(), &Dataset::generate(Scale::Small))
            .await
            .unwrap();
        let ids = load_ids(&backend).await.unwrap();
        (backend, ids)
    });

    bench_operations(c, &rt, &backend, &ids);
    rt.block_on(backend.close());
}

fn bench_postgres(c: &mut Criterion) {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        return;
    };
    if !url.starts_with("postgres") {
        return;
    }

    let rt = runtime();
    let (backend, ids) = rt.block_on(async {
        let backend = PostgresBackend::connect(&PoolConfig::new(url)).await.unwrap();
        let ids = load_ids(&backend).await.unwrap();
        (backend, ids)
    });

    bench_operations(c, &rt, &backend, &ids);
    rt.block_on(backend.close());
}

criterion_group!(benches, bench_sqlite, bench_postgres);
criterion_main!(benches);
