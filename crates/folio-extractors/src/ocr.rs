//! Local OCR engine backed by Tesseract.
//!
//! Fully offline; slower and less accurate than the vision API but always
//! available, and the only route for PDFs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, ExtractResult};

/// Recognizes text from a raw byte buffer.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Run recognition on `buffer`.
    async fn recognize(&self, buffer: &[u8]) -> ExtractResult<String>;

    /// Human-readable name for this engine.
    fn name(&self) -> &str;
}

/// Configuration for the Tesseract engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language pack (default: "eng").
    pub language: String,
    /// Input resolution hint passed to Tesseract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpi: Option<i32>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            dpi: None,
        }
    }
}

/// Tesseract OCR engine (requires the `tesseract` binary at runtime).
#[derive(Debug, Clone, Default)]
pub struct TesseractOcrEngine {
    config: OcrConfig,
}

impl TesseractOcrEngine {
    /// Create an engine with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom settings.
    pub fn with_config(config: OcrConfig) -> Self {
        Self { config }
    }

    #[cfg(feature = "ocr")]
    fn recognize_sync(buffer: &[u8], config: &OcrConfig) -> ExtractResult<String> {
        use rusty_tesseract::{Args, Image};

        let img = image::load_from_memory(buffer)
            .map_err(|e| ExtractError::Ocr(format!("Unsupported input encoding: {}", e)))?;

        // Tesseract reads from disk; stage a PNG copy for the duration of the call
        let staged = tempfile::Builder::new()
            .prefix("folio-ocr-")
            .suffix(".png")
            .tempfile()?;
        img.save_with_format(staged.path(), image::ImageFormat::Png)
            .map_err(|e| ExtractError::Ocr(format!("Failed to stage image: {}", e)))?;
        let tesseract_image = Image::from_path(staged.path())
            .map_err(|e| ExtractError::Ocr(format!("Failed to stage image: {}", e)))?;

        let args = Args {
            lang: config.language.clone(),
            dpi: config.dpi,
            ..Args::default()
        };

        rusty_tesseract::image_to_string(&tesseract_image, &args)
            .map_err(|e| ExtractError::Ocr(e.to_string()))
    }
}

#[async_trait]
impl OcrEngine for TesseractOcrEngine {
    #[cfg(feature = "ocr")]
    async fn recognize(&self, buffer: &[u8]) -> ExtractResult<String> {
        let buffer = buffer.to_vec();
        let config = self.config.clone();

        // Tesseract is CPU bound and shells out; keep it off the async workers
        tokio::task::spawn_blocking(move || Self::recognize_sync(&buffer, &config)).await?
    }

    #[cfg(not(feature = "ocr"))]
    async fn recognize(&self, _buffer: &[u8]) -> ExtractResult<String> {
        Err(ExtractError::Ocr(
            "OCR feature not enabled. Enable the 'ocr' feature.".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
