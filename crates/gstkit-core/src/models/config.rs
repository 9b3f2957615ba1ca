//! Configuration structures for rate scraping, caching, OCR, and extraction.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GstError, Result};

/// Main configuration for gstkit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GstConfig {
    /// Where the published rate file is found.
    pub source: SourceConfig,

    /// Rate cache location.
    pub cache: CacheConfig,

    /// Keyword lookup policy.
    pub lookup: LookupConfig,

    /// OCR tooling.
    pub ocr: OcrConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Rate page and download configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Page listing the GST rate files.
    pub page_url: String,

    /// Base for resolving relative links on the page.
    pub base_url: String,

    /// Deadline for fetching the page.
    pub page_timeout_secs: u64,

    /// Deadline for downloading the rate file.
    pub file_timeout_secs: u64,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            page_url: "https://cbic-gst.gov.in/gst-goods-services-rates.html".to_string(),
            base_url: "https://cbic-gst.gov.in/".to_string(),
            page_timeout_secs: 30,
            file_timeout_secs: 60,
            user_agent: concat!("gstkit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Rate cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// JSON file holding the parsed rate table.
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_data_dir().join("gst_rates_cache.json"),
        }
    }
}

/// Keyword lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Rate (percent) reported when no entry matches.
    pub default_rate: u32,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self { default_rate: 18 }
    }
}

/// OCR tooling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Path to the tesseract binary (default relies on PATH).
    pub tesseract_path: String,

    /// Path to poppler's pdftoppm binary.
    pub pdftoppm_path: String,

    /// Tesseract language code.
    pub language: String,

    /// DPI for rendering PDF pages to images.
    pub dpi: u32,

    /// Maximum image dimension (longer side) handed to tesseract.
    pub max_image_size: u32,

    /// Use embedded PDF text instead of OCR when there is enough of it.
    pub prefer_embedded_text: bool,

    /// Minimum embedded text length to skip OCR.
    pub min_text_length: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: "tesseract".to_string(),
            pdftoppm_path: "pdftoppm".to_string(),
            language: "eng".to_string(),
            dpi: 300,
            max_image_size: 4096,
            prefer_embedded_text: false,
            min_text_length: 50,
        }
    }
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Reject GSTINs whose check character does not verify.
    pub validate_gstin: bool,

    /// Invoice number reported when none is found.
    pub default_invoice_number: String,

    /// GST rate (percent) reported when none is found.
    pub default_gst_rate: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            validate_gstin: false,
            default_invoice_number: "Unknown".to_string(),
            default_gst_rate: 18,
        }
    }
}

impl GstConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| GstError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load from `path` if given, else from the default location if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| GstError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gstkit")
        .join("config.json")
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gstkit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{"lookup": {"default_rate": 12}, "ocr": {"dpi": 200}}"#;
        let config: GstConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.lookup.default_rate, 12);
        assert_eq!(config.ocr.dpi, 200);
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.source.page_timeout_secs, 30);
        assert_eq!(config.source.file_timeout_secs, 60);
        assert_eq!(config.extraction.default_invoice_number, "Unknown");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = GstConfig::default();
        config.cache.path = dir.path().join("rates.json");
        config.save(&path).unwrap();

        let loaded = GstConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded.cache.path, config.cache.path);
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(GstConfig::from_file(&path), Err(GstError::Config(_))));
        assert!(matches!(
            GstConfig::from_file(&dir.path().join("missing.json")),
            Err(GstError::Io(_))
        ));
    }
}
