//! Callable-function endpoints.
//!
//! Requests carry `{"data": ...}` and successful responses `{"result": ...}`.

use axum::{body::Bytes, extract::State, Extension, Json};
use folio_core::{ReextractRequest, ReextractResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::middleware::Caller;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CallableRequest<T> {
    #[serde(default)]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
pub struct CallableResponse<T> {
    pub result: T,
}

/// Re-extract all files of a content record.
/// POST /rpc/extractTextFromContent
pub async fn extract_text_from_content(
    State(state): State<AppState>,
    Extension(Caller(claims)): Extension<Caller>,
    body: Bytes,
) -> ApiResult<Json<CallableResponse<ReextractResponse>>> {
    // An unreadable body is treated as an empty request so the identity
    // checks still run first.
    let request = serde_json::from_slice::<CallableRequest<ReextractRequest>>(&body)
        .unwrap_or_else(|e| {
            debug!(error = %e, "Unreadable callable body");
            CallableRequest::default()
        })
        .data
        .unwrap_or_default();

    let result = state
        .reextract()
        .reextract(request.content_id.as_deref(), claims.as_ref())
        .await?;

    Ok(Json(CallableResponse { result }))
}
