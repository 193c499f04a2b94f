//! Middleware for the HTTP server.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use folio_core::RequesterClaims;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::state::AppState;

/// Identity of the caller, resolved from the bearer token.
#[derive(Debug, Clone, Default)]
pub struct Caller(pub Option<RequesterClaims>);

/// Create CORS middleware.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Request logging middleware.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}

/// Resolve the bearer token into a [`Caller`] extension.
///
/// Never rejects: an absent or unknown token yields a caller without claims,
/// and handlers decide what that means.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .and_then(|token| state.claims_for(token.trim()));

    if claims.is_none() {
        debug!(uri = %request.uri(), "No recognised bearer token");
    }

    request.extensions_mut().insert(Caller(claims));
    next.run(request).await
}
