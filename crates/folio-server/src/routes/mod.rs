//! Route definitions for the HTTP server.

mod events;
mod health;
mod rpc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};

use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Storage notifications
        .route("/events/storage", post(events::receive_storage_event))
        // Callable functions
        .route(
            "/rpc/extractTextFromContent",
            post(rpc::extract_text_from_content),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        // Attach state
        .with_state(state)
}

pub use events::*;
pub use health::*;
pub use rpc::*;
