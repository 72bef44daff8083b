//! API module
//!
//! HTTP request handlers and the router that wires them together.

pub mod chat;
pub mod files;
pub mod health;
pub mod middleware;
pub mod streaming;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.ingestion.max_upload_bytes;

    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/process-files", post(files::process_files))
        .route("/api/chat", post(chat::chat))
        .route("/api/chat/stream", post(streaming::chat_stream))
        // Enforced by the extractors, so oversized uploads get the JSON error body
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive()) // Allow CORS for development
        .with_state(state)
}
