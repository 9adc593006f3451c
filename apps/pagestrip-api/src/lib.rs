//! Pagestrip API - remove a page from uploaded PDFs, deliver a zip
//!
//! Router construction lives here so integration tests can drive the
//! service without binding a socket.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod intake;
pub mod state;
pub mod stream;

use state::AppState;

/// Headroom over the aggregate upload budget for multipart framing and
/// the text fields.
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

/// Build the application router with all routes configured
pub fn app(state: Arc<AppState>) -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.limits.max_total_bytes + BODY_LIMIT_SLACK;

    Router::new()
        // Landing page
        .route("/", get(handlers::index))
        // Health check
        .route("/health", get(handlers::health))
        // Core operation
        .route("/remove-page", post(handlers::remove_page_handler))
        // Add middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
