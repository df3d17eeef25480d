// HTTP request handlers
use crate::presentation::app_state::AppState;
use crate::presentation::page::render_page;
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::StreamExt;
use std::convert::Infallible;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Dashboard page, rendered with whatever the view holds right now
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    let dashboard = state.dashboard_service.current();
    match render_page(&dashboard) {
        Ok(page) => ([(header::CACHE_CONTROL, "no-store")], Html(page)).into_response(),
        Err(e) => {
            tracing::error!("Error rendering dashboard page: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Current dashboard as JSON
pub async fn dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.dashboard_service.current())
}

/// Server-sent events: the current dashboard, then one per view change
pub async fn stream_dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut updates = Box::pin(state.dashboard_service.updates());

    let events = async_stream::stream! {
        while let Some(dashboard) = updates.next().await {
            match Event::default().event("dashboard").json_data(&dashboard) {
                Ok(event) => yield Ok::<_, Infallible>(event),
                Err(e) => tracing::error!("Error encoding dashboard update: {}", e),
            }
        }
    };

    Sse::new(events).keep_alive(KeepAlive::default())
}
