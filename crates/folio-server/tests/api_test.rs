//! HTTP surface tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use folio_core::{
    ContentRecord, DocumentStore, EventDispatch, FolioConfig, MemoryDocumentStore,
    RequesterClaims,
};
use folio_extractors::{
    BlobLocation, ExtractError, ExtractResult, ExtractionRouter, ExtractionStrategy, StrategyChain,
};
use folio_server::{create_server, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Strategy answering with the object's file name, or failing for `bad.*`.
struct EchoFileName;

#[async_trait]
impl ExtractionStrategy for EchoFileName {
    async fn extract(&self, location: &BlobLocation) -> ExtractResult<String> {
        match location.file_name() {
            name if name.starts_with("bad.") => Err(ExtractError::Ocr("unreadable".into())),
            name => Ok(name.to_string()),
        }
    }

    fn name(&self) -> &str {
        "echo"
    }
}

fn state() -> (AppState, Arc<MemoryDocumentStore>) {
    state_with(EventDispatch::Inline)
}

fn state_with(dispatch: EventDispatch) -> (AppState, Arc<MemoryDocumentStore>) {
    let mut config = FolioConfig::default();
    config.events.dispatch = dispatch;
    config
        .auth
        .tokens
        .insert("admin-token".into(), RequesterClaims::admin("admin-1"));
    config
        .auth
        .tokens
        .insert("user-token".into(), RequesterClaims::user("user-1"));

    let chain = StrategyChain::new().then(Arc::new(EchoFileName));
    let router = Arc::new(ExtractionRouter::from_chains(chain.clone(), chain));
    let store = Arc::new(MemoryDocumentStore::new());

    (AppState::new(config, router, store.clone()), store)
}

fn app(state: AppState) -> Router {
    create_server(state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn storage_event(name: &str) -> Request<Body> {
    let body = json!({"name": name, "bucket": "notes", "contentType": "image/png"});
    Request::post("/events/storage")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn rpc(token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::post("/rpc/extractTextFromContent")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn health_reports_version() {
    let (state, _) = state();
    let (status, body) = send(
        app(state),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn rpc_success_returns_result_envelope() {
    let (state, store) = state();
    store
        .put(ContentRecord::new("abc123").with_files([
            "gs://notes/content/abc123/a.pdf",
            "gs://notes/content/abc123/bad.png",
            "gs://notes/content/abc123/b.jpg",
        ]))
        .await
        .unwrap();

    let (status, body) = send(
        app(state),
        rpc(Some("admin-token"), json!({"data": {"contentId": "abc123"}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"result": {
            "success": true,
            "extractedLength": 12,
            "message": "Text extraction completed successfully"
        }})
    );
    let record = store.get("abc123").await.unwrap().unwrap();
    assert_eq!(record.content_text.as_deref(), Some("a.pdf\n\nb.jpg"));
}

#[tokio::test]
async fn rpc_without_token_is_unauthenticated() {
    let (state, _) = state();
    let (status, body) = send(app(state), rpc(None, json!({"data": {"contentId": "x"}}))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["status"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn rpc_with_unknown_token_is_unauthenticated() {
    let (state, _) = state();
    let (status, _) = send(
        app(state),
        rpc(Some("forged"), json!({"data": {"contentId": "x"}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rpc_non_admin_is_denied() {
    let (state, store) = state();
    let record = ContentRecord::new("abc123").with_files(["gs://notes/content/abc123/a.pdf"]);
    store.put(record.clone()).await.unwrap();

    let (status, body) = send(
        app(state),
        rpc(Some("user-token"), json!({"data": {"contentId": "abc123"}})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["status"], "PERMISSION_DENIED");
    assert_eq!(store.get("abc123").await.unwrap(), Some(record));
}

#[tokio::test]
async fn rpc_precondition_errors() {
    let (state, store) = state();
    store.put(ContentRecord::new("empty")).await.unwrap();

    let cases = [
        (json!({"data": {}}), StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
        (json!({}), StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
        (json!({"data": {"contentId": "ghost"}}), StatusCode::NOT_FOUND, "NOT_FOUND"),
        (json!({"data": {"contentId": "empty"}}), StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
    ];

    for (body, expected_status, expected_code) in cases {
        let (status, response) = send(app(state.clone()), rpc(Some("admin-token"), body)).await;
        assert_eq!(status, expected_status);
        assert_eq!(response["error"]["status"], expected_code);
    }
}

#[tokio::test]
async fn storage_event_is_extracted_before_response() {
    let (state, store) = state();
    store.put(ContentRecord::new("abc123")).await.unwrap();

    let (status, body) = send(app(state), storage_event("content/abc123/scan.png")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"outcome": "extracted", "recordId": "abc123"}));

    let record = store.get("abc123").await.unwrap().unwrap();
    assert_eq!(record.content_text.as_deref(), Some("scan.png"));
}

#[tokio::test]
async fn storage_event_failed_extraction_is_acknowledged() {
    let (state, store) = state();
    store.put(ContentRecord::new("abc123")).await.unwrap();

    let (status, body) = send(app(state), storage_event("content/abc123/bad.png")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "failed");

    let record = store.get("abc123").await.unwrap().unwrap();
    assert_eq!(
        record.text_extraction_error.as_deref(),
        Some("OCR failed: unreadable")
    );
}

#[tokio::test]
async fn storage_event_outside_namespace_is_acknowledged() {
    let (state, store) = state();
    let (status, body) = send(app(state), storage_event("avatars/u1/me.png")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"outcome": "ignored"}));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn storage_event_unpersisted_result_is_not_acknowledged() {
    let (state, store) = state();

    let (status, body) = send(app(state), storage_event("content/ghost/scan.png")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["status"], "INTERNAL");
    assert!(store.get("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn queued_storage_event_without_worker_is_unavailable() {
    let (state, store) = state_with(EventDispatch::Queued);
    store.put(ContentRecord::new("abc123")).await.unwrap();

    let (status, body) = send(app(state), storage_event("content/abc123/scan.png")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["status"], "UNAVAILABLE");

    let record = store.get("abc123").await.unwrap().unwrap();
    assert!(record.content_text.is_none());
}

#[tokio::test]
async fn queued_storage_event_is_extracted_by_worker() {
    let (state, store) = state_with(EventDispatch::Queued);
    store.put(ContentRecord::new("abc123")).await.unwrap();
    let _worker = state.spawn_worker();

    let (status, body) = send(app(state), storage_event("content/abc123/scan.png")).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["delivered"], 1);

    let mut text = None;
    for _ in 0..50 {
        text = store.get("abc123").await.unwrap().unwrap().content_text;
        if text.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(text.as_deref(), Some("scan.png"));
}

#[tokio::test]
async fn storage_event_rejects_undecodable_body() {
    let (state, _) = state();
    let request = Request::post("/events/storage")
        .body(Body::from("definitely not json"))
        .unwrap();
    let (status, body) = send(app(state), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
}
