//! Parse command - turn a local rate file into a rate table.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::info;

use gstkit_core::{parse_rate_file, RateCache, RateFileFormat};

use super::{load_config, print_json};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Rate file (.xlsx, .xls or .pdf)
    #[arg(required = true)]
    input: PathBuf,

    /// File format (default: from the file extension)
    #[arg(short, long)]
    format: Option<RateFileFormat>,

    /// Also store the parsed table as the rate cache
    #[arg(long)]
    save: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let format = match args.format {
        Some(format) => format,
        None => RateFileFormat::from_name(&args.input.to_string_lossy()).ok_or_else(|| {
            anyhow::anyhow!(
                "Cannot tell the format of {}; pass --format",
                args.input.display()
            )
        })?,
    };

    info!("Parsing {} as {}", args.input.display(), format);
    let content = fs::read(&args.input)?;
    let table = tokio::task::spawn_blocking(move || parse_rate_file(&content, format)).await??;

    if args.save {
        let cache = RateCache::new(&config.cache.path);
        cache.save(&table)?;
        eprintln!(
            "{} Saved {} rates to {}",
            style("✓").green(),
            table.len(),
            cache.path().display()
        );
    }

    print_json(&table)
}
