//! moviedb benchmark binary.

use clap::Parser;
use moviedb_bench::{report, run_url, Args, BenchConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("moviedb_bench=info,moviedb_core=info")),
        )
        .init();

    let args = Args::parse();
    let config = BenchConfig::try_from(&args)?;

    print!("{}", report::format_header(&config));
    println!();

    let mut results = Vec::with_capacity(config.database_urls.len());
    for (index, url) in config.database_urls.iter().enumerate() {
        info!(database = index, setup = ?config.setup, "Starting benchmark");
        let bench = run_url(url, &config).await?;
        results.push(bench);
    }

    if let Some(path) = &config.json {
        report::write_json(path, &config, &results)?;
    }

    Ok(())
}
