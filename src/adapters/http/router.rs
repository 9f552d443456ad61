//! Router and middleware.

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapters::http::handlers::{chat_handler, health_handler, quick_actions_handler};
use crate::ports::ChatPort;

/// Create the application router.
///
/// Endpoints:
/// - POST /chat                - Answer a message
/// - GET  /chat/quick-actions  - Quick action id -> canned reply
/// - GET  /health              - Liveness and version
pub fn create_router(chat: Arc<dyn ChatPort>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/chat/quick-actions", get(quick_actions_handler))
        .route("/health", get(health_handler))
        .with_state(chat)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
