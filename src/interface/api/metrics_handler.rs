//! Prometheus metrics handler

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics exporter. Installs the global
/// recorder, so this must run once per process.
pub fn init_metrics() -> PrometheusHandle {
    let handle = PrometheusBuilder::new().install_recorder().unwrap();

    describe_counter!(
        "calls_created_total",
        "Total number of call tasks created, by call type"
    );
    describe_counter!(
        "ai_calls_placed_total",
        "Total number of outbound AI calls requested from the voice provider"
    );
    describe_counter!(
        "webhook_events_total",
        "Total number of provider webhook events received, by disposition"
    );

    handle
}

/// HTTP metrics handler
pub async fn metrics_handler(
    axum::extract::State(prometheus_handle): axum::extract::State<PrometheusHandle>,
) -> Response {
    let metrics = prometheus_handle.render();
    (StatusCode::OK, metrics).into_response()
}

/// Record a created call task
pub fn record_call_created(call_type: &str) {
    counter!("calls_created_total", "call_type" => call_type.to_string()).increment(1);
}

/// Record an outbound AI call placement attempt
pub fn record_ai_call_placed(success: bool) {
    counter!("ai_calls_placed_total", "success" => success.to_string()).increment(1);
}

/// Record a received webhook event
pub fn record_webhook_event(disposition: &str) {
    counter!("webhook_events_total", "disposition" => disposition.to_string()).increment(1);
}
