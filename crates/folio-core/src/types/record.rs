//! Content record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A piece of uploaded content and its extraction state.
///
/// The extraction pipeline owns `content_text` and the diagnostic fields;
/// everything in `metadata` belongs to the CRUD layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Unique identifier.
    pub id: String,
    /// References to the attached files (download URLs or `gs://` references).
    #[serde(default)]
    pub file_urls: Vec<String>,
    /// Extracted text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_text: Option<String>,
    /// When `content_text` was last written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_extracted_at: Option<DateTime<Utc>>,
    /// Message of the most recent failed automatic extraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_extraction_error: Option<String>,
    /// When the most recent failed automatic extraction happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_extraction_attempted_at: Option<DateTime<Utc>>,
    /// CRUD-owned fields (title, subject, status, ...).
    #[serde(flatten)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ContentRecord {
    /// Create a record with no files and no extracted text.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_urls: Vec::new(),
            content_text: None,
            text_extracted_at: None,
            text_extraction_error: None,
            text_extraction_attempted_at: None,
            metadata: HashMap::new(),
        }
    }

    /// Set the attached files.
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_urls = files.into_iter().map(Into::into).collect();
        self
    }

    /// Add a metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Apply an extraction update, stamping it with `now`.
    ///
    /// Only the fields named by the update are touched.
    pub fn apply(&mut self, update: &RecordUpdate, now: DateTime<Utc>) {
        match update {
            RecordUpdate::Extracted { content_text } => {
                self.content_text = Some(content_text.clone());
                self.text_extracted_at = Some(now);
            }
            RecordUpdate::ExtractionFailed { error } => {
                self.text_extraction_error = Some(error.clone());
                self.text_extraction_attempted_at = Some(now);
            }
        }
    }
}

/// A write produced by the extraction pipeline.
///
/// Timestamps are assigned by the store at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordUpdate {
    /// Overwrite `contentText` and `textExtractedAt`.
    Extracted { content_text: String },
    /// Overwrite `textExtractionError` and `textExtractionAttemptedAt`.
    ExtractionFailed { error: String },
}

impl RecordUpdate {
    /// Build the update that persists `outcome`.
    pub fn from_outcome(outcome: ExtractionOutcome) -> Self {
        match outcome {
            ExtractionOutcome::Text(content_text) => Self::Extracted { content_text },
            ExtractionOutcome::Error(error) => Self::ExtractionFailed { error },
        }
    }
}

/// Per-file result of an extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Extracted text (possibly empty).
    Text(String),
    /// Error message of a failed attempt.
    Error(String),
}
