//! Call API DTOs

use crate::domain::call_task::{CallStatus, CallTask, CallType};
use crate::domain::error::DomainError;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Create a manual call task
#[derive(Debug, Deserialize)]
pub struct CreateCallTaskRequest {
    pub phone_number: String,
    pub contact_name: Option<String>,
    pub scheduled_time: i64,
    #[serde(default)]
    pub status: Option<CallStatus>,
}

/// Partial update of a call task; only status and scheduled time may be
/// changed through the manual API.
#[derive(Debug, Deserialize)]
pub struct UpdateCallTaskRequest {
    pub status: Option<CallStatus>,
    pub scheduled_time: Option<i64>,
}

/// Call task response
#[derive(Debug, Serialize, Deserialize)]
pub struct CallTaskResponse {
    pub id: i32,
    pub phone_number: String,
    pub contact_name: Option<String>,
    pub scheduled_time: i64,
    pub created_at: i64,
    pub status: CallStatus,
    pub call_type: CallType,
    pub vapi_call_id: Option<String>,
    pub booking_date: Option<String>,
    pub booking_time: Option<String>,
    pub num_players: Option<i32>,
    pub player_name: Option<String>,
    pub transcript: Option<String>,
    pub booking_confirmed: Option<bool>,
    pub ai_summary: Option<String>,
    pub ended_reason: Option<String>,
}

impl From<CallTask> for CallTaskResponse {
    fn from(task: CallTask) -> Self {
        CallTaskResponse {
            id: task.id,
            phone_number: task.phone_number,
            contact_name: task.contact_name,
            scheduled_time: task.scheduled_time,
            created_at: task.created_at,
            status: task.status,
            call_type: task.call_type,
            vapi_call_id: task.vapi_call_id,
            booking_date: task.booking_date,
            booking_time: task.booking_time,
            num_players: task.num_players,
            player_name: task.player_name,
            transcript: task.transcript,
            booking_confirmed: task.booking_confirmed,
            ai_summary: task.ai_summary,
            ended_reason: task.ended_reason,
        }
    }
}

/// Call task list response
#[derive(Debug, Serialize, Deserialize)]
pub struct CallTaskListResponse {
    pub calls: Vec<CallTaskResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Generic API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Map a domain error onto its HTTP status and response body.
pub fn error_response<T>(err: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match &err {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::InvalidState(_) | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Provider(_) => StatusCode::BAD_GATEWAY,
        DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}
