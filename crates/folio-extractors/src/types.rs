//! Core types for content extraction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of a stored object: bucket plus object path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobLocation {
    /// Bucket identifier.
    pub bucket: String,
    /// Object path inside the bucket (not percent-encoded).
    pub path: String,
}

impl BlobLocation {
    /// Create a new blob location.
    pub fn new(bucket: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            path: path.into(),
        }
    }

    /// Render as a `gs://bucket/path` reference.
    pub fn gs_uri(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.path)
    }

    /// Last path segment, if any.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

impl fmt::Display for BlobLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.path)
    }
}

/// A single text annotation returned by a text-detection service.
///
/// The first annotation of a response covers the whole page; the rest are
/// individual words.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    /// Detected text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// BCP-47 locale of the detected text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl TextAnnotation {
    /// Annotation with only a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            locale: None,
        }
    }
}
