//! PDF page rendering with `pdftoppm`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::Result;
use crate::error::OcrError;
use crate::models::config::OcrConfig;

const PAGE_PREFIX: &str = "page";

/// Renders every page of a PDF to PNG.
#[derive(Debug, Clone)]
pub struct PdfRasterizer {
    path: String,
    dpi: u32,
}

impl PdfRasterizer {
    pub fn new(path: impl Into<String>, dpi: u32) -> Self {
        Self {
            path: path.into(),
            dpi,
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(&config.pdftoppm_path, config.dpi)
    }

    /// Render `pdf` into `out_dir`, returning page images in page order.
    pub fn render(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        debug!("Rendering {} at {} dpi", pdf.display(), self.dpi);

        let output = Command::new(&self.path)
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg(pdf)
            .arg(out_dir.join(PAGE_PREFIX))
            .output()
            .map_err(|source| OcrError::Spawn {
                tool: "pdftoppm",
                path: self.path.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::ToolFailed {
                tool: "pdftoppm",
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let pages = collect_pages(out_dir)?;
        if pages.is_empty() {
            return Err(OcrError::NoPages(pdf.display().to_string()));
        }

        debug!("Rendered {} pages", pages.len());
        Ok(pages)
    }
}

/// Page images named `page-N.png` (N possibly zero-padded), sorted by N.
fn collect_pages(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages: Vec<(u32, PathBuf)> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter_map(|path| page_number(&path).map(|n| (n, path)))
        .collect();

    pages.sort_by_key(|(n, _)| *n);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

fn page_number(path: &Path) -> Option<u32> {
    if path.extension()?.to_str()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix(PAGE_PREFIX)?.strip_prefix('-')?.parse().ok()
}
