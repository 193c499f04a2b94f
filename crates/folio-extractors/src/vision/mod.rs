//! Remote text detection.
//!
//! The Cloud Vision client lives behind the `vision` feature; the trait and
//! its configuration are always available.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ExtractResult;
use crate::types::{BlobLocation, TextAnnotation};

#[cfg(feature = "vision")]
mod cloud;

#[cfg(feature = "vision")]
pub use cloud::CloudVisionDetector;

/// Detects text in a stored image.
#[async_trait]
pub trait TextDetector: Send + Sync {
    /// Return the ordered text annotations for the image at `location`.
    async fn detect_text(&self, location: &BlobLocation) -> ExtractResult<Vec<TextAnnotation>>;

    /// Human-readable name for this detector.
    fn name(&self) -> &str;
}

/// Configuration for the Cloud Vision client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// API endpoint (default: https://vision.googleapis.com).
    pub endpoint: String,
    /// API key, sent as the `key` query parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// OAuth access token, sent as a bearer token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://vision.googleapis.com".to_string(),
            api_key: None,
            access_token: None,
        }
    }
}

impl VisionConfig {
    /// Whether any credential is configured.
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() || self.access_token.is_some()
    }
}
