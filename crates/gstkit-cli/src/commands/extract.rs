//! Extract command - invoice fields from text, a text file, or a scanned invoice.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use gstkit_core::invoice::InvoiceFieldParser;
use gstkit_core::models::invoice::InvoiceFields;
use gstkit_core::ocr::IMAGE_EXTENSIONS;
use gstkit_core::{ExtractionResult, GstConfig, InvoiceOcr};

use super::{load_config, print_json};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Invoice text (words are joined with spaces)
    text: Vec<String>,

    /// Read the text from a file; PDFs and images are OCR'd first
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = match &args.file {
        Some(path) => read_invoice_text(path, &config).await?,
        None => args.text.join(" "),
    };

    let parser = InvoiceFieldParser::from_config(&config.extraction);
    let result = parser.parse(&text);
    info!("{} fields defaulted", result.warnings.len());

    match args.format {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Csv => {
            print!("{}", format_csv(&result.fields)?);
            Ok(())
        }
        OutputFormat::Text => {
            print!("{}", format_text(&result));
            Ok(())
        }
    }
}

async fn read_invoice_text(path: &Path, config: &GstConfig) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension != "pdf" && !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Ok(fs::read_to_string(path)?);
    }

    info!("Running OCR on {}", path.display());
    let ocr = InvoiceOcr::new(config.ocr.clone());
    let input = path.to_path_buf();
    let result = tokio::task::spawn_blocking(move || ocr.extract_text(&input)).await??;
    Ok(result.text)
}

fn format_csv(fields: &InvoiceFields) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["vendor", "invoiceNo", "date", "gstin", "hsn", "total", "gstRate"])?;
    wtr.write_record([
        fields.vendor.as_deref().unwrap_or_default(),
        fields.invoice_no.as_str(),
        fields.date.as_str(),
        fields.gstin.as_deref().unwrap_or_default(),
        fields.hsn.as_str(),
        fields.total.to_string().as_str(),
        fields.gst_rate.to_string().as_str(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let fields = &result.fields;
    let mut output = String::new();

    output.push_str(&format!("Vendor:  {}\n", fields.vendor.as_deref().unwrap_or("-")));
    output.push_str(&format!("Invoice: {}\n", fields.invoice_no));
    match fields.invoice_date {
        Some(date) => output.push_str(&format!("Date:    {} ({})\n", fields.date, date)),
        None => output.push_str(&format!("Date:    {}\n", fields.date)),
    }
    output.push_str(&format!("GSTIN:   {}\n", fields.gstin.as_deref().unwrap_or("-")));
    output.push_str(&format!("HSN:     {}\n", fields.hsn));
    output.push_str(&format!("Total:   {}\n", fields.total));
    output.push_str(&format!("GST:     {}%\n", fields.gst_rate));

    if !result.warnings.is_empty() {
        output.push('\n');
        for warning in &result.warnings {
            output.push_str(&format!("warning: {}\n", warning));
        }
    }

    output
}
