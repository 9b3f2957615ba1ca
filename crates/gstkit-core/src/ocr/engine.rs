//! Invoice OCR pipeline: render, preprocess, recognise, join.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use super::{
    preprocessing::ImagePreprocessor, rasterize::PdfRasterizer, tesseract::TesseractCli,
    OcrBackend, OcrResult, Result, TextSource, IMAGE_EXTENSIONS,
};
use crate::error::OcrError;
use crate::models::config::OcrConfig;
use crate::pdf::{PdfExtractor, PdfProcessor, PdfType};

/// Turns an invoice PDF or image into plain text.
pub struct InvoiceOcr<B: OcrBackend = TesseractCli> {
    backend: B,
    rasterizer: PdfRasterizer,
    preprocessor: ImagePreprocessor,
    config: OcrConfig,
}

impl InvoiceOcr<TesseractCli> {
    /// Pipeline backed by the tesseract CLI.
    pub fn new(config: OcrConfig) -> Self {
        Self::with_backend(TesseractCli::from_config(&config), config)
    }
}

impl<B: OcrBackend> InvoiceOcr<B> {
    pub fn with_backend(backend: B, config: OcrConfig) -> Self {
        Self {
            backend,
            rasterizer: PdfRasterizer::from_config(&config),
            preprocessor: ImagePreprocessor::new().with_max_size(config.max_image_size),
            config,
        }
    }

    /// Extract text from a PDF or image file.
    ///
    /// Fails with [`OcrError::EmptyText`] when nothing was recognised.
    pub fn extract_text(&self, path: &Path) -> Result<OcrResult> {
        let start = Instant::now();

        if !path.is_file() {
            return Err(OcrError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let (text, pages, source) = if extension == "pdf" {
            match self.embedded_text(path) {
                Some(text) => (text, 0, TextSource::Embedded),
                None => {
                    let (text, pages) = self.recognize_pdf(path)?;
                    (text, pages, TextSource::Ocr)
                }
            }
        } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            (self.recognize_image(path)?, 1, TextSource::Ocr)
        } else {
            return Err(OcrError::UnsupportedInput(path.display().to_string()));
        };

        if text.is_empty() {
            return Err(OcrError::EmptyText);
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Extracted {} chars from {} ({:?}, {}ms)",
            text.len(),
            path.display(),
            source,
            processing_time_ms
        );

        Ok(OcrResult {
            text,
            pages,
            source,
            processing_time_ms,
        })
    }

    fn recognize_pdf(&self, path: &Path) -> Result<(String, usize)> {
        let work_dir = tempfile::tempdir()?;
        let pages = self.rasterizer.render(path, work_dir.path())?;
        let text = self.recognize_pages(&pages)?;
        Ok((text, pages.len()))
    }

    fn recognize_image(&self, path: &Path) -> Result<String> {
        let work_dir = tempfile::tempdir()?;
        let prepared = self.preprocessor.prepare_file(path, work_dir.path())?;
        self.recognize_pages(&[prepared])
    }

    /// Recognise each page, dropping empty ones, and join with newlines.
    fn recognize_pages(&self, pages: &[PathBuf]) -> Result<String> {
        let mut texts = Vec::with_capacity(pages.len());
        for page in pages {
            let text = self.backend.recognize(page)?;
            let text = text.trim();
            if text.is_empty() {
                debug!("No text on {}", page.display());
                continue;
            }
            texts.push(text.to_string());
        }
        Ok(texts.join("\n").trim().to_string())
    }

    /// Embedded PDF text, when enabled and long enough to trust.
    fn embedded_text(&self, path: &Path) -> Option<String> {
        if !self.config.prefer_embedded_text {
            return None;
        }

        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return None;
            }
        };
        let extractor = match PdfExtractor::from_bytes(&data) {
            Ok(extractor) => extractor,
            Err(e) => {
                warn!("Failed to load PDF text layer, using OCR: {}", e);
                return None;
            }
        };

        if extractor.analyze(self.config.min_text_length) != PdfType::Text {
            debug!("PDF looks scanned, using OCR");
            return None;
        }

        extractor
            .extract_text()
            .ok()
            .map(|text| text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// Returns canned text per file name.
    struct FakeBackend(HashMap<String, String>);

    impl FakeBackend {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self(
                pages
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl OcrBackend for FakeBackend {
        fn recognize(&self, image: &Path) -> Result<String> {
            let name = image.file_name().unwrap().to_string_lossy().to_string();
            Ok(self.0.get(&name).cloned().unwrap_or_default())
        }
    }

    #[test]
    fn test_pages_joined_and_blank_pages_skipped() {
        let ocr = InvoiceOcr::with_backend(
            FakeBackend::new(&[
                ("page-1.png", "  Invoice INV-7 \n"),
                ("page-2.png", "   \n"),
                ("page-3.png", "Total 1,180\n\n"),
            ]),
            OcrConfig::default(),
        );

        let pages: Vec<PathBuf> = ["page-1.png", "page-2.png", "page-3.png"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(ocr.recognize_pages(&pages).unwrap(), "Invoice INV-7\nTotal 1,180");
    }

    #[test]
    fn test_image_input_is_preprocessed() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("receipt.png");
        GrayImage::from_pixel(40, 20, Luma([255])).save(&input).unwrap();

        let ocr = InvoiceOcr::with_backend(
            FakeBackend::new(&[("receipt-prepared.png", "vendor acme total 500")]),
            OcrConfig::default(),
        );

        let result = ocr.extract_text(&input).unwrap();
        assert_eq!(result.text, "vendor acme total 500");
        assert_eq!(result.pages, 1);
        assert_eq!(result.source, TextSource::Ocr);
    }

    #[test]
    fn test_empty_text_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("blank.png");
        GrayImage::from_pixel(10, 10, Luma([255])).save(&input).unwrap();

        let ocr = InvoiceOcr::with_backend(FakeBackend::new(&[]), OcrConfig::default());
        assert!(matches!(ocr.extract_text(&input), Err(OcrError::EmptyText)));
    }

    #[test]
    fn test_unsupported_and_missing_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "hello").unwrap();

        let ocr = InvoiceOcr::with_backend(FakeBackend::new(&[]), OcrConfig::default());
        assert!(matches!(
            ocr.extract_text(&notes),
            Err(OcrError::UnsupportedInput(_))
        ));
        assert!(matches!(
            ocr.extract_text(&dir.path().join("missing.pdf")),
            Err(OcrError::Io(_))
        ));
    }

    #[test]
    fn test_pdf_without_pdftoppm() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("invoice.pdf");
        std::fs::write(&input, b"%PDF-1.4").unwrap();

        let config = OcrConfig {
            pdftoppm_path: "/nonexistent/pdftoppm".to_string(),
            ..OcrConfig::default()
        };
        let ocr = InvoiceOcr::with_backend(FakeBackend::new(&[]), config);
        assert!(matches!(
            ocr.extract_text(&input),
            Err(OcrError::Spawn { tool: "pdftoppm", .. })
        ));
    }
}
