//! Invoice OCR using poppler's `pdftoppm` and the tesseract CLI.

mod engine;
mod preprocessing;
mod rasterize;
mod tesseract;

pub use engine::InvoiceOcr;
pub use preprocessing::ImagePreprocessor;
pub use rasterize::PdfRasterizer;
pub use tesseract::TesseractCli;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Result type for OCR operations.
pub type Result<T> = std::result::Result<T, OcrError>;

/// Image file extensions accepted as direct OCR input.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp"];

/// A text recogniser for a single image file.
pub trait OcrBackend {
    /// Recognise the text in an image.
    fn recognize(&self, image: &Path) -> Result<String>;
}

/// Where the returned text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSource {
    /// Recognised from rendered page images.
    Ocr,
    /// Taken from the PDF's own text layer.
    Embedded,
}

/// Text recovered from an invoice document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Page texts joined with newlines, trimmed.
    pub text: String,

    /// Number of page images processed.
    pub pages: usize,

    pub source: TextSource,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}
