//! Invoice data models.
//!
//! Field names serialise in camelCase to match what downstream invoice
//! stores already consume (`invoiceNo`, `gstRate`, ...).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default placeholder for text fields that could not be extracted.
pub const UNKNOWN: &str = "Unknown";

/// Flat set of fields pulled out of invoice text.
///
/// Every field is defaulted independently; no cross-field checks are made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFields {
    /// Vendor name as written after "vendor".
    pub vendor: Option<String>,

    /// Invoice number.
    pub invoice_no: String,

    /// Invoice date as it appeared in the text.
    pub date: String,

    /// `date` normalised to a calendar date, when it parses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,

    /// Supplier GSTIN (uppercased).
    pub gstin: Option<String>,

    /// HSN/SAC classification code.
    pub hsn: String,

    /// Invoice total, GST inclusive.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// GST rate in percent.
    pub gst_rate: u32,
}

impl Default for InvoiceFields {
    fn default() -> Self {
        Self {
            vendor: None,
            invoice_no: UNKNOWN.to_string(),
            date: UNKNOWN.to_string(),
            invoice_date: None,
            gstin: None,
            hsn: UNKNOWN.to_string(),
            total: Decimal::ZERO,
            gst_rate: 18,
        }
    }
}

impl InvoiceFields {
    /// HSN code if one was extracted.
    pub fn hsn_code(&self) -> Option<&str> {
        (self.hsn != UNKNOWN && !self.hsn.is_empty()).then_some(self.hsn.as_str())
    }
}

/// GST components of a tax-inclusive amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSplit {
    /// Amount before tax.
    #[serde(with = "rust_decimal::serde::float")]
    pub taxable_value: Decimal,

    /// Total GST.
    #[serde(with = "rust_decimal::serde::float")]
    pub gst_amount: Decimal,

    /// Central share.
    #[serde(with = "rust_decimal::serde::float")]
    pub cgst: Decimal,

    /// State share.
    #[serde(with = "rust_decimal::serde::float")]
    pub sgst: Decimal,

    /// Integrated GST (inter-state supplies).
    #[serde(with = "rust_decimal::serde::float")]
    pub igst: Decimal,
}

/// Outcome of checking an invoice's rate against the reference rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateVerification {
    /// Rate claimed on the invoice.
    #[serde(with = "rust_decimal::serde::float")]
    pub invoice_rate: Decimal,

    /// Rate found in the reference table (or its fallback).
    #[serde(with = "rust_decimal::serde::float")]
    pub verified_rate: Decimal,

    /// Whether the claimed rate matches the reference rate.
    pub verified: bool,

    /// Tax split at the invoice rate.
    pub invoice_tax: TaxSplit,

    /// Rate the adjusted split was computed at.
    #[serde(with = "rust_decimal::serde::float")]
    pub adjusted_rate: Decimal,

    /// Tax split after correcting to the reference rate.
    pub adjusted_tax: TaxSplit,

    /// Human-readable verdict.
    pub message: String,
}
