//! Pagestrip API Server - remove a page from uploaded PDFs
//!
//! Exposes:
//! - POST /remove-page: multipart PDF batch in, zip archive out
//! - GET /: landing page with the upload form
//! - GET /health: liveness check

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use pagestrip_api::{app, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pagestrip_api=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let state = Arc::new(AppState::from_env());
    info!(delivery = ?state.delivery, "Initializing pagestrip API...");

    let app = app(state);

    // Parse bind address
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting pagestrip API on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
