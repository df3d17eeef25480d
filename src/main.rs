// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::polling_view::PollingTelemetryView;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_source::HttpTelemetrySource;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config().context("Failed to load dashboard configuration")?;

    // Create telemetry source (infrastructure layer)
    let source = Arc::new(HttpTelemetrySource::new(&config.api)?);
    tracing::info!(
        history = %config.api.history_url(),
        predictions = %config.api.prediction_url(),
        "Polling telemetry API"
    );

    // Mount the view and its renderer (application layer)
    let view = Arc::new(PollingTelemetryView::mount(source, config.polling.to_poll_settings()));
    let dashboard_service = DashboardService::new(view.clone(), config.page.clone());

    // Build router (presentation layer)
    let state = Arc::new(AppState { dashboard_service });
    let app = router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.server.listen))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Starting temperature dashboard on http://{}", addr);

    let shutdown_view = view.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received");
            shutdown_view.unmount();
        })
        .await
        .context("Server error")?;

    view.unmount();
    Ok(())
}
