//! Lookup command - GST rate for a keyword or HSN code.

use std::path::Path;

use clap::Args;

use gstkit_core::lookup;

use super::{load_config, print_json, rate_table};

/// Arguments for the lookup command.
#[derive(Args)]
pub struct LookupArgs {
    /// Keyword or HSN/SAC code (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    keyword: Vec<String>,

    /// Do not download rates when no cache exists
    #[arg(long)]
    offline: bool,
}

pub async fn run(args: LookupArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let table = rate_table(&config, args.offline).await?;

    let result = lookup(&table, &args.keyword.join(" "), config.lookup.default_rate);
    print_json(&result)
}
