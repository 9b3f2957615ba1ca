//! Locate command - list rate files linked from the CBIC page.

use std::path::Path;

use clap::Args;
use serde::Serialize;
use tracing::info;

use gstkit_core::{RateLink, RateSource};

use super::{load_config, print_json};

/// Arguments for the locate command.
#[derive(Args)]
pub struct LocateArgs {
    /// Print only the URL of the first candidate
    #[arg(long)]
    first: bool,
}

#[derive(Serialize)]
struct LocateOutput {
    links: Vec<RateLink>,
}

pub async fn run(args: LocateArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let source = RateSource::new(config.source.clone())?;

    if args.first {
        let link = source.locate().await?;
        println!("{}", link.url);
        return Ok(());
    }

    let links = source.candidates().await?;
    if links.is_empty() {
        anyhow::bail!("No suitable GST rates file found on {}", config.source.page_url);
    }

    info!("Found {} rate file links", links.len());
    print_json(&LocateOutput { links })
}
