//! Manual call API handlers

use super::call_dto::{
    ApiResponse, CallTaskListResponse, CallTaskResponse, CreateCallTaskRequest,
    UpdateCallTaskRequest,
};
use super::metrics_handler::record_call_created;
use crate::application::AgentService;
use crate::domain::call_task::{CallTaskRepository, NewCallTask};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub call_repository: Arc<dyn CallTaskRepository>,
    pub agent_service: Arc<AgentService>,
}

/// Query parameters for listing call tasks
#[derive(Debug, Deserialize)]
pub struct ListCallsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

/// Health check
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List call tasks, most recently scheduled first
pub async fn list_calls(
    State(state): State<AppState>,
    Query(query): Query<ListCallsQuery>,
) -> (StatusCode, Json<ApiResponse<CallTaskListResponse>>) {
    info!(
        "API: Listing calls (limit: {}, offset: {})",
        query.limit, query.offset
    );

    let calls_result = state.call_repository.list(query.limit, query.offset).await;
    let count_result = state.call_repository.count().await;

    match (calls_result, count_result) {
        (Ok(calls), Ok(total)) => {
            let response = CallTaskListResponse {
                calls: calls.into_iter().map(Into::into).collect(),
                total,
                limit: query.limit,
                offset: query.offset,
            };
            (StatusCode::OK, Json(ApiResponse::success(response)))
        }
        (Err(e), _) | (_, Err(e)) => {
            error!("API: Failed to list calls: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e)),
            )
        }
    }
}

/// Get a call task by ID
pub async fn get_call(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> (StatusCode, Json<ApiResponse<CallTaskResponse>>) {
    info!("API: Getting call {}", id);

    match state.call_repository.find_by_id(id).await {
        Ok(Some(task)) => (StatusCode::OK, Json(ApiResponse::success(task.into()))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Call {} not found", id))),
        ),
        Err(e) => {
            error!("API: Failed to get call: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e)),
            )
        }
    }
}

/// Create a manual call task
pub async fn create_call(
    State(state): State<AppState>,
    Json(req): Json<CreateCallTaskRequest>,
) -> (StatusCode, Json<ApiResponse<CallTaskResponse>>) {
    info!("API: Creating manual call to {}", req.phone_number);

    let new_task = NewCallTask::manual(
        req.phone_number,
        req.contact_name,
        req.scheduled_time,
        req.status,
    );

    match state.call_repository.create(&new_task).await {
        Ok(task) => {
            info!("API: Created call {}", task.id);
            record_call_created(task.call_type.as_str());
            (StatusCode::CREATED, Json(ApiResponse::success(task.into())))
        }
        Err(e) => {
            error!("API: Failed to create call: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e)),
            )
        }
    }
}

/// Partially update a call task (status and scheduled time only)
pub async fn update_call(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateCallTaskRequest>,
) -> (StatusCode, Json<ApiResponse<CallTaskResponse>>) {
    info!("API: Updating call {}", id);

    let mut task = match state.call_repository.find_by_id(id).await {
        Ok(Some(task)) => task,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(format!("Call {} not found", id))),
            )
        }
        Err(e) => {
            error!("API: Failed to get call: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e)),
            );
        }
    };

    if let Some(status) = req.status {
        task.status = status;
    }
    if let Some(scheduled_time) = req.scheduled_time {
        task.scheduled_time = scheduled_time;
    }

    match state.call_repository.update(&task).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(task.into()))),
        Err(e) => {
            error!("API: Failed to update call: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e)),
            )
        }
    }
}

/// Delete a call task
pub async fn delete_call(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    info!("API: Deleting call {}", id);

    match state.call_repository.delete(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(format!("Call {} not found", id))),
        )
            .into_response(),
        Err(e) => {
            error!("API: Failed to delete call: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(e)),
            )
                .into_response()
        }
    }
}
