//! folio-extractors - Text extraction for stored content files.
//!
//! Provides the building blocks of the extraction pipeline, each behind a
//! trait so callers can inject real clients or fakes:
//!
//! - [`BlobFetcher`] - downloads raw bytes (Cloud Storage, local directory, memory)
//! - [`TextDetector`] - remote text detection (Cloud Vision)
//! - [`OcrEngine`] - local OCR (Tesseract)
//! - [`ImagePreprocessor`] - greyscale, contrast normalization, sharpening
//! - [`StrategyChain`] - ordered strategies with fallback on any error
//! - [`ExtractionRouter`] - picks the PDF or image chain for a file
//!
//! # Features
//!
//! - `ocr` (default) - Tesseract OCR via rusty-tesseract (requires tesseract installed)
//! - `vision` (default) - Cloud Vision REST client ([`CloudVisionDetector`])
//!
//! # Example
//!
//! ```ignore
//! use folio_extractors::{ExtractionRouter, GcsBlobFetcher, TesseractOcrEngine};
//!
//! let router = ExtractionRouter::builder()
//!     .fetcher(Arc::new(GcsBlobFetcher::new(None)))
//!     .ocr(Arc::new(TesseractOcrEngine::new()))
//!     .build();
//!
//! let text = router.extract("my-bucket", "content/abc/scan.pdf", "application/pdf").await?;
//! ```

mod error;
mod factory;
mod types;

pub mod blob;
pub mod ocr;
pub mod preprocess;
pub mod router;
pub mod strategy;
pub mod vision;

#[cfg(test)]
mod test_support;

pub use blob::{BlobFetcher, FsBlobFetcher, GcsBlobFetcher, MemoryBlobStore};
pub use error::{ExtractError, ExtractResult};
pub use factory::{BlobConfig, BlobProvider, ExtractorFactory};
pub use ocr::{OcrConfig, OcrEngine, TesseractOcrEngine};
pub use preprocess::{ImagePreprocessor, PreprocessConfig};
pub use router::{ExtractionRouter, ExtractionRouterBuilder, FileKind};
pub use strategy::{ExtractionStrategy, LocalOcrStrategy, StrategyChain, VisionStrategy};
pub use types::{BlobLocation, TextAnnotation};
pub use vision::{TextDetector, VisionConfig};

#[cfg(feature = "vision")]
pub use vision::CloudVisionDetector;
