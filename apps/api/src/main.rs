mod config;
mod cv;
mod errors;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::render::export::EXPORT_SETTINGS;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Catalyst API v{}", env!("CARGO_PKG_VERSION"));

    // The document store starts as an empty skeleton and lives for the whole process.
    let state = AppState::new(config.clone());
    info!(
        "Document store initialized (draft debounce {}ms)",
        config.draft_debounce.as_millis()
    );
    info!(
        "Export settings: {:?} {:?}, {}in margin",
        EXPORT_SETTINGS.page_format, EXPORT_SETTINGS.orientation, EXPORT_SETTINGS.margin_in
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the editor origin once it is deployed separately

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
