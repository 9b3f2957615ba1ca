//! Tesseract CLI backend.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::{OcrBackend, Result};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Runs `tesseract <image> stdout -l <lang>`.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    path: String,
    language: String,
}

impl TesseractCli {
    pub fn new(path: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(&config.tesseract_path, &config.language)
    }

    /// Whether the binary can be started at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.path)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl OcrBackend for TesseractCli {
    fn recognize(&self, image: &Path) -> Result<String> {
        debug!("Running {} on {}", self.path, image.display());

        let output = Command::new(&self.path)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|source| OcrError::Spawn {
                tool: "tesseract",
                path: self.path.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::ToolFailed {
                tool: "tesseract",
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
