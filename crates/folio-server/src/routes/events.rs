//! Storage notification intake.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use folio_core::{EventDispatch, StorageEvent, TriggerOutcome};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Pub/Sub push delivery wrapping a storage notification.
#[derive(Debug, Deserialize)]
struct PushEnvelope {
    message: PushMessage,
}

#[derive(Debug, Deserialize)]
struct PushMessage {
    data: String,
}

/// Result of an event handled before the response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHandled {
    /// `ignored`, `unsupported`, `extracted` or `failed`.
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
}

impl From<TriggerOutcome> for EventHandled {
    fn from(outcome: TriggerOutcome) -> Self {
        let (outcome, record_id) = match outcome {
            TriggerOutcome::Ignored(_) => ("ignored", None),
            TriggerOutcome::Unsupported { record_id } => ("unsupported", Some(record_id)),
            TriggerOutcome::Extracted { record_id, .. } => ("extracted", Some(record_id)),
            TriggerOutcome::Failed { record_id, .. } => ("failed", Some(record_id)),
        };
        Self { outcome, record_id }
    }
}

/// An event handed to the bus.
#[derive(Debug, Serialize)]
pub struct EventAccepted {
    /// Subscribers the event was delivered to.
    pub delivered: usize,
}

/// Decode either a bare object notification or a push envelope around one.
pub fn decode_event(body: &[u8]) -> ApiResult<StorageEvent> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::invalid_argument(format!("Body is not JSON: {}", e)))?;

    if value.get("message").is_some() {
        let envelope: PushEnvelope = serde_json::from_value(value)
            .map_err(|e| ApiError::invalid_argument(format!("Invalid push envelope: {}", e)))?;
        let data = STANDARD
            .decode(envelope.message.data.trim())
            .map_err(|e| ApiError::invalid_argument(format!("Invalid base64 payload: {}", e)))?;
        return serde_json::from_slice(&data)
            .map_err(|e| ApiError::invalid_argument(format!("Invalid storage event: {}", e)));
    }

    if !value.is_object() {
        return Err(ApiError::invalid_argument("Storage event must be a JSON object"));
    }
    serde_json::from_value(value)
        .map_err(|e| ApiError::invalid_argument(format!("Invalid storage event: {}", e)))
}

/// Run the ingestion trigger for a storage notification.
/// POST /events/storage
///
/// Only a `2xx` acknowledges the event. Inline dispatch answers `500` when the
/// result could not be persisted; queued dispatch answers `503` when no worker
/// is subscribed.
pub async fn receive_storage_event(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Response> {
    let event = decode_event(&body)?;
    debug!(path = ?event.name, bucket = ?event.bucket, "Storage event received");

    match state.config().events.dispatch {
        EventDispatch::Inline => {
            let outcome = state.trigger().handle(&event).await.map_err(|e| {
                error!(path = ?event.name, error = %e, "Failed to persist extraction result");
                ApiError::internal(format!("Failed to persist extraction result: {}", e))
            })?;
            Ok(Json(EventHandled::from(outcome)).into_response())
        }
        EventDispatch::Queued => {
            let delivered = state.bus().emit(event);
            if delivered == 0 {
                return Err(ApiError::unavailable("No trigger worker is running"));
            }
            Ok((StatusCode::ACCEPTED, Json(EventAccepted { delivered })).into_response())
        }
    }
}
