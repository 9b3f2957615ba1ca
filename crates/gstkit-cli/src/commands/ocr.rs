//! OCR command - print the text of an invoice PDF or image.
//!
//! Failures are reported as a single `OCR_ERROR:` line on stderr with exit
//! code 1, for callers that shell out to this command.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use gstkit_core::InvoiceOcr;

use super::load_config;

/// Arguments for the ocr command.
#[derive(Args)]
pub struct OcrArgs {
    /// Invoice PDF or image
    #[arg(required = true)]
    input: PathBuf,
}

pub async fn run(args: OcrArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => fail(&e.to_string()),
    };

    let ocr = InvoiceOcr::new(config.ocr);
    let input = args.input;
    let result = tokio::task::spawn_blocking(move || ocr.extract_text(&input)).await;

    match result {
        Ok(Ok(result)) => {
            debug!("OCR of {} pages took {}ms", result.pages, result.processing_time_ms);
            println!("{}", result.text);
            Ok(())
        }
        Ok(Err(e)) => fail(&e.to_string()),
        Err(e) => fail(&e.to_string()),
    }
}

fn fail(detail: &str) -> ! {
    eprintln!("OCR_ERROR: {}", detail);
    std::process::exit(1)
}
