//! Rate table parsing from published spreadsheets and PDFs.

mod pdf;
mod spreadsheet;

pub use pdf::{parse_pdf, parse_rate_text};
pub use spreadsheet::parse_spreadsheet;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::info;

use crate::error::TableError;
use crate::models::rates::{format_percent, RateFileFormat, RateTable};

/// Result type for table parsing.
pub type Result<T> = std::result::Result<T, TableError>;

lazy_static! {
    static ref RATE_WITH_PERCENT: Regex = Regex::new(
        r"\b(\d{1,2}(?:\.\d+)?)\s*%"
    ).unwrap();

    static ref RATE_BARE: Regex = Regex::new(
        r"\b(\d{1,2}(?:\.\d+)?)\b"
    ).unwrap();
}

/// Parse a downloaded rate file into a rate table.
///
/// Fails with [`TableError::EmptyTable`] when nothing could be extracted.
pub fn parse_rate_file(content: &[u8], format: RateFileFormat) -> Result<RateTable> {
    let table = match format {
        RateFileFormat::Xlsx | RateFileFormat::Xls => parse_spreadsheet(content)?,
        RateFileFormat::Pdf => parse_pdf(content)?,
    };

    if table.is_empty() {
        return Err(TableError::EmptyTable);
    }

    info!("Parsed {} rate entries from {} file", table.len(), format);
    Ok(table)
}

/// Normalise a free-form rate cell to `"NN%"`.
///
/// Prefers a number followed by `%`, else the first standalone one- or
/// two-digit number.
pub fn normalize_rate(raw: &str) -> Option<String> {
    let caps = RATE_WITH_PERCENT
        .captures(raw)
        .or_else(|| RATE_BARE.captures(raw))?;
    let percent = Decimal::from_str(&caps[1]).ok()?;
    Some(format_percent(percent))
}

/// Key under which a row is stored: a numeric code, else the description.
pub fn row_key(code: &str, description: &str) -> Option<String> {
    let code = code.trim();
    if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) {
        return Some(code.to_string());
    }
    let description = description.trim();
    (!description.is_empty()).then(|| description.to_string())
}
