//! Storage notification types.

use serde::{Deserialize, Serialize};

/// Notification that an object finished uploading.
///
/// Every field is optional on the wire; the trigger drops events missing the
/// path or content type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEvent {
    /// Object path inside the bucket.
    #[serde(default)]
    pub name: Option<String>,
    /// Bucket identifier.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Declared MIME type of the object.
    #[serde(default)]
    pub content_type: Option<String>,
}

impl StorageEvent {
    /// Create a fully populated event.
    pub fn new(
        bucket: impl Into<String>,
        name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            bucket: Some(bucket.into()),
            content_type: Some(content_type.into()),
        }
    }
}
