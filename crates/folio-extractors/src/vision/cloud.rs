//! Cloud Vision REST client.
//!
//! Runs TEXT_DETECTION against a `gs://` reference, so the image never passes
//! through this process.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{TextDetector, VisionConfig};
use crate::error::{ExtractError, ExtractResult};
use crate::types::{BlobLocation, TextAnnotation};

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    requests: Vec<AnnotateImageRequest<'a>>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageRef,
    features: Vec<Feature<'a>>,
}

#[derive(Debug, Serialize)]
struct ImageRef {
    source: ImageSource,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageSource {
    image_uri: String,
}

#[derive(Debug, Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

/// Cloud Vision REST client.
pub struct CloudVisionDetector {
    client: Client,
    config: VisionConfig,
}

impl CloudVisionDetector {
    /// Create a detector with the given configuration.
    pub fn new(config: VisionConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn annotate_url(&self) -> String {
        format!(
            "{}/v1/images:annotate",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    fn build_request(location: &BlobLocation) -> AnnotateRequest<'static> {
        AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageRef {
                    source: ImageSource {
                        image_uri: location.gs_uri(),
                    },
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        }
    }

    fn parse_response(body: AnnotateResponse) -> ExtractResult<Vec<TextAnnotation>> {
        let Some(first) = body.responses.into_iter().next() else {
            return Ok(Vec::new());
        };

        if let Some(status) = first.error {
            return Err(ExtractError::Vision(format!(
                "code {}: {}",
                status.code, status.message
            )));
        }

        Ok(first.text_annotations)
    }
}

#[async_trait]
impl TextDetector for CloudVisionDetector {
    async fn detect_text(&self, location: &BlobLocation) -> ExtractResult<Vec<TextAnnotation>> {
        let mut request = self
            .client
            .post(self.annotate_url())
            .json(&Self::build_request(location));

        if let Some(ref key) = self.config.api_key {
            request = request.query(&[("key", key)]);
        }
        if let Some(ref token) = self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Network(format!(
                "Vision API returned {}: {}",
                status, body
            )));
        }

        let body: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::Vision(format!("Failed to parse response: {}", e)))?;

        let annotations = Self::parse_response(body)?;
        debug!(%location, annotations = annotations.len(), "Vision text detection finished");
        Ok(annotations)
    }

    fn name(&self) -> &str {
        "cloud-vision"
    }
}
