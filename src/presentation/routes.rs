// Router assembly
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{dashboard, health_check, index, stream_dashboard};
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    // tower-http's default compression predicate skips text/event-stream
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(health_check))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
