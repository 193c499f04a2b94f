//! File-type routing onto the PDF and image extraction chains.

use std::sync::Arc;

use tracing::debug;

use crate::blob::BlobFetcher;
use crate::error::ExtractResult;
use crate::ocr::OcrEngine;
use crate::preprocess::{ImagePreprocessor, PreprocessConfig};
use crate::strategy::{LocalOcrStrategy, StrategyChain, VisionStrategy};
use crate::types::BlobLocation;
use crate::vision::TextDetector;

/// Image suffixes recognized when only a file name is known.
const IMAGE_SUFFIXES: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff"];

/// Extraction family of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// PDF document: local OCR only.
    Pdf,
    /// Image: vision first, local OCR fallback.
    Image,
    /// Anything else: not extracted.
    Unsupported,
}

impl FileKind {
    /// Classify by declared MIME type.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type == "application/pdf" {
            FileKind::Pdf
        } else if content_type.starts_with("image/") {
            FileKind::Image
        } else {
            FileKind::Unsupported
        }
    }

    /// Classify by file name suffix (case-insensitive).
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            FileKind::Pdf
        } else if IMAGE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
            FileKind::Image
        } else {
            FileKind::Unsupported
        }
    }
}

/// Routes a stored file to the extraction chain for its kind.
pub struct ExtractionRouter {
    pdf_chain: StrategyChain,
    image_chain: StrategyChain,
}

impl ExtractionRouter {
    /// Start building a router.
    pub fn builder() -> ExtractionRouterBuilder {
        ExtractionRouterBuilder::default()
    }

    /// Assemble a router from explicit chains.
    pub fn from_chains(pdf_chain: StrategyChain, image_chain: StrategyChain) -> Self {
        Self {
            pdf_chain,
            image_chain,
        }
    }

    /// Extract text for a file with a declared content type.
    ///
    /// Returns `Ok(None)` when the type is neither PDF nor image.
    pub async fn extract(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
    ) -> ExtractResult<Option<String>> {
        let location = BlobLocation::new(bucket, path);
        self.extract_kind(&location, FileKind::from_content_type(content_type))
            .await
    }

    /// Extract text for a file whose kind is already known.
    pub async fn extract_kind(
        &self,
        location: &BlobLocation,
        kind: FileKind,
    ) -> ExtractResult<Option<String>> {
        let chain = match kind {
            FileKind::Pdf => &self.pdf_chain,
            FileKind::Image => &self.image_chain,
            FileKind::Unsupported => {
                debug!(%location, "Unsupported file kind, skipping extraction");
                return Ok(None);
            }
        };

        chain.run(location).await.map(Some)
    }

    /// Strategy names used for PDFs.
    pub fn pdf_strategies(&self) -> Vec<&str> {
        self.pdf_chain.names()
    }

    /// Strategy names used for images.
    pub fn image_strategies(&self) -> Vec<&str> {
        self.image_chain.names()
    }
}

/// Builder wiring injected dependencies into the two chains.
#[derive(Default)]
pub struct ExtractionRouterBuilder {
    fetcher: Option<Arc<dyn BlobFetcher>>,
    ocr: Option<Arc<dyn OcrEngine>>,
    detector: Option<Arc<dyn TextDetector>>,
    preprocess: PreprocessConfig,
}

impl ExtractionRouterBuilder {
    /// Blob source for local OCR.
    pub fn fetcher(mut self, fetcher: Arc<dyn BlobFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Local OCR engine.
    pub fn ocr(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.ocr = Some(engine);
        self
    }

    /// Remote text detector tried first for images.
    pub fn detector(mut self, detector: Arc<dyn TextDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Optional remote text detector.
    pub fn maybe_detector(mut self, detector: Option<Arc<dyn TextDetector>>) -> Self {
        self.detector = detector;
        self
    }

    /// Preprocessing applied before image OCR.
    pub fn preprocess(mut self, config: PreprocessConfig) -> Self {
        self.preprocess = config;
        self
    }

    /// Build the router. Without a fetcher and OCR engine the local
    /// strategies are omitted.
    pub fn build(self) -> ExtractionRouter {
        let mut pdf_chain = StrategyChain::new();
        let mut image_chain = StrategyChain::new();

        if let Some(detector) = self.detector {
            image_chain = image_chain.then(Arc::new(VisionStrategy::new(detector)));
        }

        if let (Some(fetcher), Some(ocr)) = (self.fetcher, self.ocr) {
            pdf_chain = pdf_chain.then(Arc::new(LocalOcrStrategy::new(
                fetcher.clone(),
                ocr.clone(),
            )));
            image_chain = image_chain.then(Arc::new(
                LocalOcrStrategy::new(fetcher, ocr)
                    .with_preprocessor(ImagePreprocessor::with_config(self.preprocess)),
            ));
        }

        ExtractionRouter::from_chains(pdf_chain, image_chain)
    }
}
