//! Extraction strategies and the ordered fallback chain that composes them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::blob::BlobFetcher;
use crate::error::{ExtractError, ExtractResult};
use crate::ocr::OcrEngine;
use crate::preprocess::ImagePreprocessor;
use crate::types::BlobLocation;
use crate::vision::TextDetector;

/// One way of turning a stored file into text.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Extract text from the object at `location`.
    async fn extract(&self, location: &BlobLocation) -> ExtractResult<String>;

    /// Human-readable name for this strategy.
    fn name(&self) -> &str;
}

/// Text detection through a remote vision service.
pub struct VisionStrategy {
    detector: Arc<dyn TextDetector>,
}

impl VisionStrategy {
    /// Wrap a text detector.
    pub fn new(detector: Arc<dyn TextDetector>) -> Self {
        Self { detector }
    }
}

#[async_trait]
impl ExtractionStrategy for VisionStrategy {
    async fn extract(&self, location: &BlobLocation) -> ExtractResult<String> {
        let annotations = self.detector.detect_text(location).await?;

        // Zero annotations is a blank page, not a failure
        Ok(annotations
            .into_iter()
            .next()
            .and_then(|a| a.description)
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "vision"
    }
}

/// Download, optionally preprocess, then run local OCR.
pub struct LocalOcrStrategy {
    fetcher: Arc<dyn BlobFetcher>,
    engine: Arc<dyn OcrEngine>,
    preprocessor: Option<ImagePreprocessor>,
}

impl LocalOcrStrategy {
    /// OCR the raw downloaded bytes.
    pub fn new(fetcher: Arc<dyn BlobFetcher>, engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            fetcher,
            engine,
            preprocessor: None,
        }
    }

    /// Run `preprocessor` on the bytes before OCR.
    pub fn with_preprocessor(mut self, preprocessor: ImagePreprocessor) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }
}

#[async_trait]
impl ExtractionStrategy for LocalOcrStrategy {
    async fn extract(&self, location: &BlobLocation) -> ExtractResult<String> {
        let bytes = self.fetcher.download(location).await?;

        let buffer = match self.preprocessor {
            Some(ref preprocessor) => preprocessor.preprocess(&bytes).await?,
            None => bytes,
        };

        self.engine.recognize(&buffer).await
    }

    fn name(&self) -> &str {
        if self.preprocessor.is_some() {
            "local-ocr-preprocessed"
        } else {
            "local-ocr"
        }
    }
}

/// Ordered list of strategies; any error from one hands over to the next.
#[derive(Clone, Default)]
pub struct StrategyChain {
    strategies: Vec<Arc<dyn ExtractionStrategy>>,
}

impl StrategyChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy to the end of the chain.
    pub fn then(mut self, strategy: Arc<dyn ExtractionStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Names of the strategies, in order.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Number of strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if the chain has no strategies.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Run the chain. The last strategy's error is returned unchanged.
    pub async fn run(&self, location: &BlobLocation) -> ExtractResult<String> {
        let mut last_error = None;

        for (index, strategy) in self.strategies.iter().enumerate() {
            match strategy.extract(location).await {
                Ok(text) => {
                    debug!(
                        %location,
                        strategy = strategy.name(),
                        chars = text.len(),
                        "Extraction succeeded"
                    );
                    return Ok(text);
                }
                Err(e) => {
                    if index + 1 < self.strategies.len() {
                        warn!(
                            %location,
                            strategy = strategy.name(),
                            error = %e,
                            "Extraction strategy failed, falling back"
                        );
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ExtractError::ExtractionFailed("No extraction strategy configured".to_string())
        }))
    }
}
