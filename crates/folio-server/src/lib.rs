//! folio-server - HTTP server for the folio extraction pipeline.
//!
//! Receives storage notifications (bare or as push envelopes), hands them to
//! the ingestion trigger through the event bus, and serves the admin
//! re-extraction call.
//!
//! # Example
//!
//! ```ignore
//! use folio_server::{create_server, create_state};
//!
//! #[tokio::main]
//! async fn main() {
//!     let state = create_state(folio_core::FolioConfig::from_env()).unwrap();
//!     let _worker = state.spawn_worker();
//!     let app = create_server(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod error;
pub mod factory;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use factory::create_state;
pub use state::AppState;

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
