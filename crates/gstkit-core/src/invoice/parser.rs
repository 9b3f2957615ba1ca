//! Rule-based GST invoice parser.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::invoice::InvoiceFields;

use super::rules::{
    normalize_date, AmountExtractor, DateExtractor, FieldExtractor, GstinExtractor,
    RateExtractor, HSN, INVOICE_NUMBER, VENDOR,
};

/// Result of invoice extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Extracted invoice fields.
    #[serde(flatten)]
    pub fields: InvoiceFields,
    /// Text the fields were extracted from (lowercased).
    #[serde(skip)]
    pub raw_text: String,
    /// One entry per field that fell back to its default.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    #[serde(skip)]
    pub processing_time_ms: u64,
}

/// Best-effort extractor for free-form invoice text or OCR output.
///
/// Each field is taken from its first match or defaulted; fields are not
/// checked against each other.
pub struct InvoiceFieldParser {
    /// Whether to validate GSTIN check characters.
    validate_gstin: bool,
    /// Invoice number used when none is found.
    default_invoice_number: String,
    /// GST rate used when none is found.
    default_gst_rate: u32,
}

impl InvoiceFieldParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            validate_gstin: config.validate_gstin,
            default_invoice_number: config.default_invoice_number.clone(),
            default_gst_rate: config.default_gst_rate,
        }
    }

    /// Set GSTIN checksum validation.
    pub fn with_gstin_validation(mut self, validate: bool) -> Self {
        self.validate_gstin = validate;
        self
    }

    /// Parse invoice fields from text.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let text = text.to_lowercase();
        let mut fields = InvoiceFields::default();
        let mut warnings = Vec::new();
        let mut missing =
            |field: &str| warnings.push(format!("{} not found, using default", field));

        match VENDOR.captures(&text) {
            Some(caps) => {
                fields.vendor = Some(caps[1].trim().to_string()).filter(|v| !v.is_empty())
            }
            None => missing("vendor"),
        }

        match INVOICE_NUMBER.captures(&text) {
            Some(caps) => fields.invoice_no = caps[2].to_string(),
            None => {
                fields.invoice_no = self.default_invoice_number.clone();
                missing("invoiceNo");
            }
        }

        match DateExtractor::new().extract(&text) {
            Some(m) => {
                fields.invoice_date = normalize_date(&m.value);
                fields.date = m.value;
            }
            None => missing("date"),
        }

        let gstin = GstinExtractor::new()
            .with_validation(self.validate_gstin)
            .extract(&text);
        match gstin {
            Some(m) => fields.gstin = Some(m.value),
            None => missing("gstin"),
        }

        match HSN.captures(&text) {
            Some(caps) => fields.hsn = caps[2].to_string(),
            None => missing("hsn"),
        }

        match AmountExtractor::new().extract(&text) {
            Some(m) => fields.total = m.value,
            None => missing("total"),
        }

        match RateExtractor::new().extract(&text) {
            Some(m) => fields.gst_rate = m.value,
            None => {
                fields.gst_rate = self.default_gst_rate;
                missing("gstRate");
            }
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;
        debug!("Extraction warnings: {:?}", warnings);
        info!(
            "Extracted invoice {} ({} fields defaulted) in {}ms",
            fields.invoice_no,
            warnings.len(),
            processing_time_ms
        );

        ExtractionResult {
            fields,
            raw_text: text,
            warnings,
            processing_time_ms,
        }
    }
}

impl Default for InvoiceFieldParser {
    fn default() -> Self {
        Self::new()
    }
}
