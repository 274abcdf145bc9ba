//! API Router configuration

use super::agent_handler::{create_ai_agent_call, get_call_status, refresh_call};
use super::call_handler::{
    create_call, delete_call, get_call, health_check, list_calls, update_call, AppState,
};
use super::metrics_handler::metrics_handler;
use super::webhook_handler::vapi_webhook;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the API router
pub fn build_router(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    // Health check route
    let health_routes = Router::new().route("/health", get(health_check));

    // Manual call CRUD routes
    let call_routes = Router::new()
        .route("/calls", post(create_call))
        .route("/calls", get(list_calls))
        .route("/calls/:id", get(get_call))
        .route("/calls/:id", patch(update_call))
        .route("/calls/:id", delete(delete_call));

    // AI agent routes
    let agent_routes = Router::new()
        .route("/calls/ai-agent", post(create_ai_agent_call))
        .route("/calls/:id/status", get(get_call_status))
        .route("/calls/:id/refresh", post(refresh_call));

    // Provider webhook route
    let webhook_routes = Router::new().route("/webhooks/vapi", post(vapi_webhook));

    // Metrics route (separate state)
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    // Combine routes with state
    Router::new()
        .merge(health_routes)
        .merge(call_routes)
        .merge(agent_routes)
        .merge(webhook_routes)
        .with_state(state)
        .merge(metrics_routes)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
