//! Rates command - cache status and refresh.

use std::path::Path;

use clap::Args;

use gstkit_core::RateCache;

use super::{load_config, print_json, refresh_cache};

/// Arguments for the rates command.
#[derive(Args)]
pub struct RatesArgs {
    /// Download the current rate file even if a cache exists
    #[arg(long, conflicts_with = "offline")]
    refresh: bool,

    /// Never touch the network; report the cache as it is
    #[arg(long)]
    offline: bool,
}

pub async fn run(args: RatesArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let cache = RateCache::new(&config.cache.path);
    let status = cache.status()?;

    if args.refresh || (!status.has_cache && !args.offline) {
        let report = refresh_cache(&cache, &config).await?;
        return print_json(&report);
    }

    print_json(&status)
}
