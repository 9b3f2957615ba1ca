//! Verify command - check a claimed GST rate and split the tax.

use std::path::Path;

use clap::Args;
use rust_decimal::Decimal;

use gstkit_core::verify::{reference_rate, verify_rate};

use super::{load_config, print_json, rate_table};

/// Arguments for the verify command.
#[derive(Args)]
pub struct VerifyArgs {
    /// Invoice total, GST inclusive
    #[arg(long)]
    total: Decimal,

    /// GST rate claimed on the invoice, in percent
    #[arg(long)]
    rate: Decimal,

    /// HSN/SAC code to look the reference rate up by
    #[arg(long)]
    hsn: Option<String>,

    /// Do not download rates when no cache exists
    #[arg(long)]
    offline: bool,
}

pub async fn run(args: VerifyArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let table = rate_table(&config, args.offline).await?;

    let reference = reference_rate(&table, args.hsn.as_deref(), config.lookup.default_rate);
    let result = verify_rate(args.total, args.rate, reference);
    print_json(&result)
}
