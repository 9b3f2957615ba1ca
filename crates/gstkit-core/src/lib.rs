//! Core library for Indian GST rate tables and invoice extraction.
//!
//! This crate provides:
//! - Rate file discovery on the CBIC rates page and download
//! - Rate table parsing from spreadsheets and PDFs
//! - A JSON rate cache with keyword/HSN lookup
//! - Invoice OCR via poppler and tesseract
//! - Rule-based invoice field extraction (GSTIN, HSN, dates, totals, rates)
//! - Rate verification and CGST/SGST splitting

pub mod cache;
pub mod error;
pub mod invoice;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod source;
pub mod tables;
pub mod verify;

pub use cache::{lookup, CacheStatus, RateCache, RateLookup, RefreshReport};
pub use error::{GstError, Result};
pub use invoice::{ExtractionResult, InvoiceFieldParser};
pub use models::config::GstConfig;
pub use models::invoice::{InvoiceFields, RateVerification, TaxSplit};
pub use models::rates::{RateEntry, RateFileFormat, RateTable};
pub use ocr::{InvoiceOcr, OcrBackend, OcrResult};
pub use pdf::{PdfExtractor, PdfProcessor, PdfType};
pub use source::{RateLink, RateSource};
pub use tables::parse_rate_file;
pub use verify::{split_tax, verify_rate};
