//! CLI application for GST rate lookup and invoice extraction.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, extract, locate, lookup, ocr, parse, rates, verify};

/// GST toolkit - CBIC rate tables, invoice OCR and invoice field extraction
#[derive(Parser)]
#[command(name = "gstkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find rate file links on the CBIC rates page
    Locate(locate::LocateArgs),

    /// Parse a downloaded rate file into a rate table
    Parse(parse::ParseArgs),

    /// Show or refresh the rate cache
    Rates(rates::RatesArgs),

    /// Look up the GST rate for a keyword or HSN code
    Lookup(lookup::LookupArgs),

    /// Extract text from an invoice PDF or image with OCR
    Ocr(ocr::OcrArgs),

    /// Extract invoice fields from text
    Extract(extract::ExtractArgs),

    /// Check an invoice's GST rate against the rate table
    Verify(verify::VerifyArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Locate(args) => locate::run(args, config_path).await,
        Commands::Parse(args) => parse::run(args, config_path).await,
        Commands::Rates(args) => rates::run(args, config_path).await,
        Commands::Lookup(args) => lookup::run(args, config_path).await,
        Commands::Ocr(args) => ocr::run(args, config_path).await,
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Verify(args) => verify::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
