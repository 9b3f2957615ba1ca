//! Common regex patterns for GST invoice extraction.
//!
//! Patterns are case-insensitive; the parser lowercases its input anyway.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Vendor name up to the first character outside the name alphabet
    pub static ref VENDOR: Regex = Regex::new(
        r"(?i)vendor\s+([a-z0-9\s.&]+)"
    ).unwrap();

    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)invoice\s+(number\s*)?([a-z0-9\-/]+)"
    ).unwrap();

    // "12 mar 2025", "12 march 2025"
    pub static ref DATE_TEXTUAL: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s*(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s*(\d{4})\b"
    ).unwrap();

    // "12/03/2025", "12-3-25"
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{1,2})[-/](\d{1,2})[-/](\d{4}|\d{2})\b"
    ).unwrap();

    // 2 digit state code, 10 character PAN, entity code, "z", check character.
    // The label may be glued to the number ("gstin27aapfu0939f1zv").
    pub static ref GSTIN: Regex = Regex::new(
        r"(?i)(?:gstin)?\s*([0-9]{2}[a-z]{5}[0-9]{4}[a-z0-9]{4})"
    ).unwrap();

    pub static ref HSN: Regex = Regex::new(
        r"(?i)hsn\s*(code)?\s*([0-9]{4,8})"
    ).unwrap();

    pub static ref TOTAL: Regex = Regex::new(
        r"(?i)(?:total|amount)\s*(?:is)?\s*(\d+[,\d]*(?:\.\d+)?)"
    ).unwrap();

    pub static ref GST_RATE: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s*(?:percent|%)"
    ).unwrap();
}
