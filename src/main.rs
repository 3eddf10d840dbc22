//! Main entry point for the apk-latest CLI application.
//!
//! Resolves every requested package against the configured repositories and
//! prints `name==version` pins on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use apk_latest::{Cli, IndexSource, Resolution, Resolver, open_source};

/// Exit status when some packages were not found in any repository.
const EXIT_MISSING: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let sources = cli
        .repositories
        .iter()
        .map(|location| open_source(location, cli.fetch_options()))
        .collect::<Result<Vec<_>>>()?;

    let resolution = resolve_all(&sources, &cli.packages).await?;

    let pins = resolution.pins();
    if !pins.is_empty() {
        println!("{}", pins.join(" "));
    }

    let missing = resolution.missing();
    if !missing.is_empty() {
        eprintln!("missing packages: {}", missing.join(", "));
        return Ok(ExitCode::from(EXIT_MISSING));
    }

    Ok(ExitCode::SUCCESS)
}

/// Scan every source in order, one at a time.
///
/// Each archive is decoded on the blocking pool; the resolver moves into the
/// task and back out, so only one source is ever folded at once. The first
/// failure aborts the whole run.
async fn resolve_all(
    sources: &[Box<dyn IndexSource>],
    packages: &[String],
) -> Result<Resolution> {
    let mut resolver = Resolver::new(packages.iter().cloned());

    for source in sources {
        let location = source.location().to_string();
        let reader = source.open().await?;

        let (returned, stats) = tokio::task::spawn_blocking(move || {
            let stats = resolver.scan(reader);
            (resolver, stats)
        })
        .await?;
        resolver = returned;

        let stats = stats.with_context(|| format!("Failed to read index {location}"))?;
        info!(
            source = %location,
            records = stats.records,
            matched = stats.matched,
            replaced = stats.replaced,
            transferred = source.transferred_bytes(),
            "scanned index"
        );
    }

    Ok(resolver.finish())
}
