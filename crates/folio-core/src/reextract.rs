//! Admin-triggered re-extraction of every file attached to a record.

use std::sync::Arc;

use folio_extractors::{ExtractionRouter, FileKind};
use tracing::{debug, info, instrument, warn};

use crate::error::{FolioError, FolioResult};
use crate::storage_path::parse_file_url;
use crate::traits::DocumentStore;
use crate::types::{ReextractResponse, RecordUpdate, RequesterClaims};

/// Separator appended after each file's text.
const FILE_SEPARATOR: &str = "\n\n";

/// Rebuilds a record's text from all of its files.
pub struct ReextractService {
    router: Arc<ExtractionRouter>,
    store: Arc<dyn DocumentStore>,
}

impl ReextractService {
    /// Create a service extracting through `router` and writing to `store`.
    pub fn new(router: Arc<ExtractionRouter>, store: Arc<dyn DocumentStore>) -> Self {
        Self { router, store }
    }

    /// Re-extract text for `content_id` on behalf of `claims`.
    ///
    /// Preconditions are checked in order (identity, admin claim, id, record,
    /// files) before any download. Files are processed in stored order; a file
    /// that cannot be resolved or extracted is logged and skipped. The trimmed
    /// concatenation is written in a single update.
    #[instrument(skip(self, claims))]
    pub async fn reextract(
        &self,
        content_id: Option<&str>,
        claims: Option<&RequesterClaims>,
    ) -> FolioResult<ReextractResponse> {
        let claims = claims
            .ok_or_else(|| FolioError::unauthenticated("Must be authenticated to extract text"))?;
        if !claims.admin {
            return Err(FolioError::permission_denied(
                "Only admins can trigger text extraction",
            ));
        }

        let content_id = content_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| FolioError::invalid_argument("Content ID is required"))?;

        let record = self
            .store
            .get(content_id)
            .await
            .map_err(|e| FolioError::Internal(e.to_string()))?
            .ok_or_else(|| FolioError::not_found(content_id))?;

        if record.file_urls.is_empty() {
            return Err(FolioError::no_files(content_id));
        }

        let mut accumulated = String::new();
        for file_url in &record.file_urls {
            let location = match parse_file_url(file_url) {
                Ok(location) => location,
                Err(e) => {
                    warn!(record_id = content_id, error = %e, "Skipping unresolvable file URL");
                    continue;
                }
            };

            let kind = FileKind::from_file_name(&location.path);
            if kind == FileKind::Unsupported {
                debug!(record_id = content_id, path = %location.path, "Skipping unsupported file");
                continue;
            }

            match self.router.extract_kind(&location, kind).await {
                Ok(Some(text)) if !text.is_empty() => {
                    accumulated.push_str(&text);
                    accumulated.push_str(FILE_SEPARATOR);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(record_id = content_id, %location, error = %e, "File extraction failed");
                }
            }
        }

        let content_text = accumulated.trim().to_string();
        let extracted_length = content_text.chars().count();

        self.store
            .update(content_id, RecordUpdate::Extracted { content_text })
            .await
            .map_err(|e| FolioError::Internal(e.to_string()))?;

        info!(record_id = content_id, extracted_length, "Re-extraction completed");

        Ok(ReextractResponse {
            success: true,
            extracted_length,
            message: "Text extraction completed successfully".to_string(),
        })
    }
}
