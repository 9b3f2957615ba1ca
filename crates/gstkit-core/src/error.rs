//! Error types for the gstkit-core library.

use thiserror::Error;

/// Main error type for the gstkit library.
#[derive(Error, Debug)]
pub enum GstError {
    /// Rate page scraping or download error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Rate table parsing error.
    #[error("rate table error: {0}")]
    Table(#[from] TableError),

    /// Rate cache error.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while locating or downloading the published rate file.
#[derive(Error, Debug)]
pub enum SourceError {
    /// HTTP transport failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// A configured or scraped URL could not be parsed.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The page did not link to any rate file.
    #[error("no suitable GST rates file found on {0}")]
    NoRateFile(String),
}

/// Errors raised while turning a rate file into a rate table.
#[derive(Error, Debug)]
pub enum TableError {
    /// The workbook could not be opened.
    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    /// The PDF could not be read.
    #[error("failed to read PDF: {0}")]
    Pdf(#[from] PdfError),

    /// Parsing succeeded but produced no entries.
    #[error("parsed rate table is empty")]
    EmptyTable,
}

/// Errors related to the on-disk rate cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Reading or writing the cache file failed.
    #[error("cache I/O at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The cache file is not a valid rate table.
    #[error("malformed cache file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Refresh failed upstream.
    #[error("refresh failed: {0}")]
    Refresh(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// An external tool could not be started.
    #[error("failed to run {tool} (is it installed? path='{path}'): {source}")]
    Spawn {
        tool: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An external tool exited with a failure status.
    #[error("{tool} failed (exit code {code}): {stderr}")]
    ToolFailed {
        tool: &'static str,
        code: i32,
        stderr: String,
    },

    /// Rasterisation produced no page images.
    #[error("no pages rendered from {0}")]
    NoPages(String),

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// Input has an extension the pipeline does not handle.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// Temporary working directory could not be created.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// OCR ran but recognised no text.
    #[error("no text recognised")]
    EmptyText,
}

/// Result type for the gstkit library.
pub type Result<T> = std::result::Result<T, GstError>;
