//! Server initialization
//!
//! Contains the main `run()` function that starts all server components.

use super::background_tasks::start_session_cleanup;
use super::loader::load_config;
use super::shutdown::shutdown_signal;
use super::template::TemplateAsset;
use crate::api::AppState;
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use gsurv_core::{Orchestrator, RunSettings, SessionRegistry, TemplateOffer, WorkflowSet};
use gsurv_data::DatasetLoader;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Room for multipart framing around the largest accepted upload
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the HTTP router over shared state
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .merge(crate::api::health_routes())
        .merge(crate::api::api_router())
        .route("/", get(|| async { "GSurvWeb" }))
        .with_state(state)
        .layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Run the server
pub async fn run(settings: RunSettings) -> Result<()> {
    let config = load_config()?;

    info!(
        dev_mode = settings.dev_mode,
        verbose = settings.verbose,
        "Configuration loaded"
    );

    let loader = DatasetLoader::xlsx()
        .with_max_upload_bytes(config.server.max_upload_bytes)
        .with_cache_capacity(config.cache.max_entries);
    info!(
        max_upload_bytes = config.server.max_upload_bytes,
        cache_entries = config.cache.max_entries,
        "Dataset loader initialized"
    );

    let template = TemplateAsset::load(&config.template)?;
    info!(
        file_name = %template.file_name,
        bytes = template.bytes.len(),
        "Template workbook ready"
    );

    if let Some(path) = &settings.local_data_path {
        info!("Developer data path: {}", path.display());
    }

    let orchestrator = Orchestrator::new(Arc::new(loader), WorkflowSet::default(), settings)
        .context("Failed to initialize orchestrator")?
        .with_template(TemplateOffer::new(
            template.file_name.clone(),
            "/api/v1/template",
        ));

    let registry = Arc::new(
        SessionRegistry::new()
            .with_max_idle_secs(config.session.max_idle_secs)
            .with_max_sessions(config.session.max_sessions),
    );

    let shutdown = CancellationToken::new();
    let cleanup = start_session_cleanup(
        registry.clone(),
        config.session.cleanup_interval_secs,
        shutdown.clone(),
    );

    let state = AppState::new(Arc::new(orchestrator), registry, template);
    let app = build_router(state, config.server.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("Server error")?;

    shutdown.cancel();
    if let Err(e) = cleanup.await {
        tracing::warn!("Session cleanup task ended abnormally: {}", e);
    }

    info!("GSurvWeb shutdown complete");
    Ok(())
}
