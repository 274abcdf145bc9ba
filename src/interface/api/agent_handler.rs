//! AI agent API handlers

use super::call_dto::{error_response, ApiResponse, CallTaskResponse};
use super::call_handler::AppState;
use super::metrics_handler::{record_ai_call_placed, record_call_created};
use crate::application::AiAgentCallRequest;
use crate::domain::DomainError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

/// Create an AI-agent booking call: persist the task, then place the
/// outbound call with the voice provider.
pub async fn create_ai_agent_call(
    State(state): State<AppState>,
    Json(req): Json<AiAgentCallRequest>,
) -> (StatusCode, Json<ApiResponse<CallTaskResponse>>) {
    info!(
        "API: Creating AI agent call to {} for {} at {}",
        req.phone_number, req.booking_date, req.booking_time
    );

    match state.agent_service.create_ai_agent_call(req).await {
        Ok(task) => {
            record_call_created(task.call_type.as_str());
            record_ai_call_placed(true);
            (StatusCode::CREATED, Json(ApiResponse::success(task.into())))
        }
        Err(e) => {
            error!("API: Failed to create AI agent call: {}", e);
            if matches!(e, DomainError::Provider(_)) {
                record_ai_call_placed(false);
            }
            error_response(e)
        }
    }
}

/// Get the current state of a call task
pub async fn get_call_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> (StatusCode, Json<ApiResponse<CallTaskResponse>>) {
    info!("API: Getting status of call {}", id);

    match state.agent_service.get_call_status(id).await {
        Ok(task) => (StatusCode::OK, Json(ApiResponse::success(task.into()))),
        Err(e) => error_response(e),
    }
}

/// Poll the voice provider and reconcile the task with its view of the
/// call
pub async fn refresh_call(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> (StatusCode, Json<ApiResponse<CallTaskResponse>>) {
    info!("API: Refreshing call {} from provider", id);

    match state.agent_service.refresh_call(id).await {
        Ok(task) => (StatusCode::OK, Json(ApiResponse::success(task.into()))),
        Err(e) => {
            error!("API: Failed to refresh call {}: {}", id, e);
            error_response(e)
        }
    }
}
