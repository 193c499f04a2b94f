//! Factory for creating extraction components from configuration.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::blob::{BlobFetcher, FsBlobFetcher, GcsBlobFetcher};
use crate::ocr::{OcrConfig, OcrEngine, TesseractOcrEngine};
use crate::preprocess::PreprocessConfig;
use crate::router::ExtractionRouter;
use crate::vision::{TextDetector, VisionConfig};

#[cfg(feature = "vision")]
use crate::vision::CloudVisionDetector;

/// Blob storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlobProvider {
    /// Cloud Storage JSON API.
    #[default]
    Gcs,
    /// Local directory mirror.
    Filesystem,
}

/// Blob storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    /// Backend to use.
    pub provider: BlobProvider,
    /// Storage API endpoint for the `gcs` provider.
    pub base_url: String,
    /// Bearer token for the `gcs` provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Root directory for the `filesystem` provider.
    pub root: PathBuf,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            provider: BlobProvider::Gcs,
            base_url: GcsBlobFetcher::DEFAULT_BASE_URL.to_string(),
            access_token: None,
            root: PathBuf::from("./storage"),
        }
    }
}

/// Factory for creating extraction components.
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create the configured blob fetcher.
    pub fn blob_fetcher(config: &BlobConfig) -> Arc<dyn BlobFetcher> {
        match config.provider {
            BlobProvider::Gcs => Arc::new(GcsBlobFetcher::with_base_url(
                config.base_url.clone(),
                config.access_token.clone(),
            )),
            BlobProvider::Filesystem => Arc::new(FsBlobFetcher::new(config.root.clone())),
        }
    }

    /// Create a Tesseract engine.
    pub fn ocr(config: &OcrConfig) -> Arc<dyn OcrEngine> {
        Arc::new(TesseractOcrEngine::with_config(config.clone()))
    }

    /// Create a Cloud Vision detector, or `None` when no credential is configured.
    #[cfg(feature = "vision")]
    pub fn text_detector(config: &VisionConfig) -> Option<Arc<dyn TextDetector>> {
        if !config.has_credentials() {
            return None;
        }
        Some(Arc::new(CloudVisionDetector::new(config.clone())))
    }

    /// Built without the `vision` feature: images always use local OCR.
    #[cfg(not(feature = "vision"))]
    pub fn text_detector(config: &VisionConfig) -> Option<Arc<dyn TextDetector>> {
        if config.has_credentials() {
            tracing::warn!("Vision credentials ignored, built without the `vision` feature");
        }
        None
    }

    /// Assemble a router around an existing fetcher.
    pub fn router_with_fetcher(
        fetcher: Arc<dyn BlobFetcher>,
        ocr: &OcrConfig,
        vision: &VisionConfig,
        preprocess: &PreprocessConfig,
    ) -> ExtractionRouter {
        let detector = Self::text_detector(vision);
        if detector.is_none() {
            info!("Vision API credentials not configured, images use local OCR only");
        }

        ExtractionRouter::builder()
            .fetcher(fetcher)
            .ocr(Self::ocr(ocr))
            .maybe_detector(detector)
            .preprocess(preprocess.clone())
            .build()
    }

    /// Assemble a router from configuration.
    pub fn router(
        blob: &BlobConfig,
        ocr: &OcrConfig,
        vision: &VisionConfig,
        preprocess: &PreprocessConfig,
    ) -> ExtractionRouter {
        Self::router_with_fetcher(Self::blob_fetcher(blob), ocr, vision, preprocess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_config_default() {
        let config = BlobConfig::default();
        assert_eq!(config.provider, BlobProvider::Gcs);
        assert_eq!(config.base_url, "https://storage.googleapis.com");
    }

    #[test]
    fn test_factory_blob_fetcher_by_provider() {
        let mut config = BlobConfig::default();
        assert_eq!(ExtractorFactory::blob_fetcher(&config).name(), "gcs");

        config.provider = BlobProvider::Filesystem;
        assert_eq!(ExtractorFactory::blob_fetcher(&config).name(), "filesystem");
    }

    #[test]
    fn test_blob_provider_rejects_unknown() {
        let result = serde_json::from_str::<BlobConfig>(r#"{"provider":"memory"}"#);
        assert!(result.is_err());
    }

    #[cfg(feature = "vision")]
    #[test]
    fn test_factory_detector_requires_credentials() {
        assert!(ExtractorFactory::text_detector(&VisionConfig::default()).is_none());

        let config = VisionConfig {
            api_key: Some("key".into()),
            ..Default::default()
        };
        let detector = ExtractorFactory::text_detector(&config).unwrap();
        assert_eq!(detector.name(), "cloud-vision");
    }

    #[cfg(not(feature = "vision"))]
    #[test]
    fn test_factory_detector_disabled_without_feature() {
        let config = VisionConfig {
            api_key: Some("key".into()),
            ..Default::default()
        };
        assert!(ExtractorFactory::text_detector(&config).is_none());
    }

    #[cfg(feature = "vision")]
    #[test]
    fn test_factory_router_with_vision() {
        let vision = VisionConfig {
            access_token: Some("token".into()),
            ..Default::default()
        };
        let router = ExtractorFactory::router(
            &BlobConfig::default(),
            &OcrConfig::default(),
            &vision,
            &PreprocessConfig::default(),
        );

        assert_eq!(router.image_strategies(), vec!["vision", "local-ocr-preprocessed"]);
        assert_eq!(router.pdf_strategies(), vec!["local-ocr"]);
    }

    #[test]
    fn test_blob_provider_deserialize() {
        let config: BlobConfig =
            serde_json::from_str(r#"{"provider":"filesystem","root":"/srv/blobs"}"#).unwrap();
        assert_eq!(config.provider, BlobProvider::Filesystem);
        assert_eq!(config.root, PathBuf::from("/srv/blobs"));
    }
}
