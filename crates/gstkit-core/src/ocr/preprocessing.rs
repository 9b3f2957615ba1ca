//! Image preprocessing for OCR.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};
use tracing::debug;

use super::Result;
use crate::error::OcrError;

/// Grayscale conversion and downscaling ahead of tesseract.
pub struct ImagePreprocessor {
    /// Maximum image dimension.
    max_size: u32,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self { max_size: 4096 }
    }

    /// Set maximum image dimension.
    pub fn with_max_size(mut self, size: u32) -> Self {
        self.max_size = size.max(1);
        self
    }

    /// Convert to grayscale and shrink so the longer side fits `max_size`.
    pub fn prepare(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        let (new_width, new_height) = self.calculate_resize_dimensions(width, height);

        let gray = DynamicImage::ImageLuma8(image.to_luma8());
        if (new_width, new_height) == (width, height) {
            return gray;
        }

        debug!("Downscaling {}x{} to {}x{}", width, height, new_width, new_height);
        gray.resize_exact(new_width, new_height, image::imageops::FilterType::Lanczos3)
    }

    /// Load `input`, prepare it and write a PNG into `out_dir`.
    pub fn prepare_file(&self, input: &Path, out_dir: &Path) -> Result<PathBuf> {
        let image = image::open(input).map_err(|e| OcrError::Preprocessing(e.to_string()))?;
        let prepared = self.prepare(&image);

        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let output = out_dir.join(format!("{}-prepared.png", stem));
        prepared
            .save(&output)
            .map_err(|e| OcrError::Preprocessing(e.to_string()))?;

        Ok(output)
    }

    fn calculate_resize_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let max_dim = width.max(height);

        if max_dim <= self.max_size {
            return (width, height);
        }

        let scale = self.max_size as f32 / max_dim as f32;
        let new_width = (width as f32 * scale) as u32;
        let new_height = (height as f32 * scale) as u32;

        (new_width.max(1), new_height.max(1))
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}
