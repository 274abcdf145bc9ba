//! Vapi webhook handler
//!
//! The provider retries on non-2xx responses, so this endpoint never
//! rejects: malformed bodies, unknown event types, and events for calls
//! we don't know all get a 200 with an "ok" or "ignored" body.

use super::call_handler::AppState;
use super::metrics_handler::record_webhook_event;
use crate::application::WebhookDisposition;
use crate::infrastructure::vapi::WebhookEnvelope;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::{debug, error};

/// Webhook acknowledgement body
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl WebhookAck {
    fn ok() -> Self {
        Self {
            status: "ok",
            reason: None,
        }
    }

    fn ignored(reason: impl Into<String>) -> Self {
        Self {
            status: "ignored",
            reason: Some(reason.into()),
        }
    }
}

/// Handle a provider-pushed event
pub async fn vapi_webhook(
    State(state): State<AppState>,
    body: String,
) -> (StatusCode, Json<WebhookAck>) {
    let envelope: WebhookEnvelope = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!("Ignoring malformed webhook body: {}", e);
            record_webhook_event("malformed");
            return (StatusCode::OK, Json(WebhookAck::ignored("malformed body")));
        }
    };

    debug!("Webhook event: {}", envelope.message.kind);

    let correlation_id = envelope.correlation_id();
    let provider_call_id = envelope.provider_call_id().map(str::to_string);
    let signal = envelope.signal();

    match state
        .agent_service
        .process_provider_event(correlation_id, provider_call_id.as_deref(), signal)
        .await
    {
        Ok(WebhookDisposition::Applied { .. }) => {
            record_webhook_event("applied");
            (StatusCode::OK, Json(WebhookAck::ok()))
        }
        Ok(WebhookDisposition::NoOp { .. }) => {
            record_webhook_event("noop");
            (StatusCode::OK, Json(WebhookAck::ok()))
        }
        Ok(WebhookDisposition::Ignored { reason }) => {
            record_webhook_event("ignored");
            (StatusCode::OK, Json(WebhookAck::ignored(reason)))
        }
        Err(e) => {
            // Webhook processing never surfaces errors to the provider.
            error!("Webhook processing failed: {}", e);
            record_webhook_event("error");
            (StatusCode::OK, Json(WebhookAck::ignored(e.to_string())))
        }
    }
}
