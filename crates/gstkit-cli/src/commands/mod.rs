//! Subcommand implementations and shared helpers.

pub mod config;
pub mod extract;
pub mod locate;
pub mod lookup;
pub mod ocr;
pub mod parse;
pub mod rates;
pub mod verify;

use std::path::Path;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use gstkit_core::{GstConfig, RateCache, RateSource, RateTable, RefreshReport};

/// Load configuration from `-c`, the default path, or built-in defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<GstConfig> {
    Ok(GstConfig::load(path)?)
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Spinner on stderr, hidden when stderr is not a terminal.
fn spinner(message: &str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Download and cache the current rate table.
pub async fn refresh_cache(cache: &RateCache, config: &GstConfig) -> anyhow::Result<RefreshReport> {
    let source = RateSource::new(config.source.clone())?;

    let pb = spinner("Refreshing GST rates from CBIC...")?;
    let result = cache.refresh(&source).await;
    pb.finish_and_clear();

    let report = result?;
    eprintln!(
        "{} Cached {} rates from {}",
        style("✓").green(),
        report.count,
        report.source
    );
    Ok(report)
}

/// The cached rate table, refreshing first when missing unless `offline`.
///
/// Offline with no cache yields an empty table, so lookups fall back to the
/// default rate.
pub async fn rate_table(config: &GstConfig, offline: bool) -> anyhow::Result<RateTable> {
    let cache = RateCache::new(&config.cache.path);
    if let Some(table) = cache.load()? {
        return Ok(table);
    }

    if offline {
        eprintln!(
            "{} No rate cache at {}, using default rate.",
            style("ℹ").blue(),
            cache.path().display()
        );
        return Ok(RateTable::new());
    }

    refresh_cache(&cache, config).await?;
    Ok(cache.load()?.unwrap_or_default())
}
