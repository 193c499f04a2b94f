//! Automatic extraction for newly uploaded content files.
//!
//! One storage event is taken through
//! `received → path-validated → type-dispatched → extracted → persisted`,
//! with failures after path validation recorded on the owning record.

use std::sync::Arc;

use folio_extractors::{BlobLocation, ExtractionRouter, FileKind};
use tracing::{debug, info, instrument, warn};

use crate::error::FolioResult;
use crate::storage_path::ContentPath;
use crate::traits::DocumentStore;
use crate::types::{ExtractionOutcome, RecordUpdate, StorageEvent};

/// Why an event was dropped without touching any record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Path, bucket or content type absent.
    MissingFields,
    /// Path outside the content namespace or without a record segment.
    OutsideNamespace,
}

/// Terminal state of one handled event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Dropped silently.
    Ignored(IgnoreReason),
    /// Neither PDF nor image; nothing persisted.
    Unsupported { record_id: String },
    /// Text persisted on the record.
    Extracted { record_id: String, length: usize },
    /// Extraction failed and the error was persisted on the record.
    Failed { record_id: String, message: String },
}

impl TriggerOutcome {
    /// Whether a record write happened.
    pub fn persisted(&self) -> bool {
        matches!(self, Self::Extracted { .. } | Self::Failed { .. })
    }
}

/// Handles storage events for files in the content namespace.
pub struct IngestionTrigger {
    router: Arc<ExtractionRouter>,
    store: Arc<dyn DocumentStore>,
    prefix: String,
}

impl IngestionTrigger {
    /// Create a trigger watching `prefix` (normally `content/`).
    ///
    /// A non-empty prefix without a trailing `/` gets one, so `content` and
    /// `content/` watch the same namespace.
    pub fn new(
        router: Arc<ExtractionRouter>,
        store: Arc<dyn DocumentStore>,
        prefix: impl Into<String>,
    ) -> Self {
        let mut prefix = prefix.into();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }

        Self {
            router,
            store,
            prefix,
        }
    }

    /// Namespace prefix this trigger watches.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Handle one storage event.
    ///
    /// Both write paths overwrite fixed fields, so redelivered events are safe.
    /// Only record store failures are returned as `Err`.
    #[instrument(skip(self, event), fields(path = ?event.name))]
    pub async fn handle(&self, event: &StorageEvent) -> FolioResult<TriggerOutcome> {
        let (Some(path), Some(bucket), Some(content_type)) = (
            event.name.as_deref(),
            event.bucket.as_deref(),
            event.content_type.as_deref(),
        ) else {
            debug!("Storage event missing path, bucket or content type");
            return Ok(TriggerOutcome::Ignored(IgnoreReason::MissingFields));
        };

        let Some(content_path) = ContentPath::parse(path, &self.prefix) else {
            debug!("Path outside content namespace");
            return Ok(TriggerOutcome::Ignored(IgnoreReason::OutsideNamespace));
        };
        let record_id = content_path.record_id.to_string();

        let kind = FileKind::from_content_type(content_type);
        if kind == FileKind::Unsupported {
            debug!(%record_id, content_type, "Content type not extracted");
            return Ok(TriggerOutcome::Unsupported { record_id });
        }

        let location = BlobLocation::new(bucket, path);
        let outcome = match self.router.extract_kind(&location, kind).await {
            Ok(Some(text)) => ExtractionOutcome::Text(text),
            Ok(None) => return Ok(TriggerOutcome::Unsupported { record_id }),
            Err(e) => ExtractionOutcome::Error(e.to_string()),
        };

        let result = match &outcome {
            ExtractionOutcome::Text(text) => {
                info!(%record_id, length = text.len(), "Extracted text");
                TriggerOutcome::Extracted {
                    record_id: record_id.clone(),
                    length: text.chars().count(),
                }
            }
            ExtractionOutcome::Error(message) => {
                warn!(%record_id, error = %message, "Text extraction failed");
                TriggerOutcome::Failed {
                    record_id: record_id.clone(),
                    message: message.clone(),
                }
            }
        };

        self.store
            .update(&record_id, RecordUpdate::from_outcome(outcome))
            .await?;

        Ok(result)
    }
}
