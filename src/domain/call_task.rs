//! Call task domain model
//!
//! A call task is one scheduled or placed phone call: either a manual
//! reminder entered by the user, or an outbound call placed through the
//! AI voice provider to book a tee time.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Current epoch time in milliseconds, the timestamp unit used across
/// the API and the mobile client.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Call task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallStatus {
    /// Waiting for its scheduled time
    Scheduled,
    /// Call is being placed or is on the line
    InProgress,
    /// Call ended with the booking confirmed
    Completed,
    /// Call ended without a booking, or could not be placed
    Failed,
    /// Cancelled by the user
    Cancelled,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Scheduled => "SCHEDULED",
            CallStatus::InProgress => "IN_PROGRESS",
            CallStatus::Completed => "COMPLETED",
            CallStatus::Failed => "FAILED",
            CallStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "SCHEDULED" => Some(CallStatus::Scheduled),
            "IN_PROGRESS" => Some(CallStatus::InProgress),
            "COMPLETED" => Some(CallStatus::Completed),
            "FAILED" => Some(CallStatus::Failed),
            "CANCELLED" => Some(CallStatus::Cancelled),
            _ => None,
        }
    }

    /// Terminal statuses are never left once a call has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CallStatus::Completed | CallStatus::Failed | CallStatus::Cancelled
        )
    }
}

/// How the call is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallType {
    /// Dialed by the user themselves
    Manual,
    /// Placed by the AI voice agent
    AiAgent,
}

impl CallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::Manual => "MANUAL",
            CallType::AiAgent => "AI_AGENT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "MANUAL" => Some(CallType::Manual),
            "AI_AGENT" => Some(CallType::AiAgent),
            _ => None,
        }
    }
}

/// Call task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallTask {
    /// Database-assigned ID, immutable once created
    pub id: i32,

    pub phone_number: String,
    pub contact_name: Option<String>,

    /// Epoch milliseconds
    pub scheduled_time: i64,
    pub created_at: i64,

    pub status: CallStatus,
    pub call_type: CallType,

    /// Provider-assigned call ID; set once known, never cleared. Used to
    /// correlate inbound webhook events when the correlation metadata is
    /// missing.
    pub vapi_call_id: Option<String>,

    /// Booking intent, populated at creation for AI-agent calls
    pub booking_date: Option<String>,
    pub booking_time: Option<String>,
    pub num_players: Option<i32>,
    pub player_name: Option<String>,

    /// Outcome, populated once the provider reports the call ended
    pub transcript: Option<String>,
    pub booking_confirmed: Option<bool>,
    pub ai_summary: Option<String>,
    pub ended_reason: Option<String>,
}

/// Data for a call task that has not been persisted yet; the store
/// assigns the ID.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCallTask {
    pub phone_number: String,
    pub contact_name: Option<String>,
    pub scheduled_time: i64,
    pub created_at: i64,
    pub status: CallStatus,
    pub call_type: CallType,
    pub booking_date: Option<String>,
    pub booking_time: Option<String>,
    pub num_players: Option<i32>,
    pub player_name: Option<String>,
}

impl NewCallTask {
    /// Create a manual call task. Status defaults to SCHEDULED when the
    /// caller does not supply one.
    pub fn manual(
        phone_number: String,
        contact_name: Option<String>,
        scheduled_time: i64,
        status: Option<CallStatus>,
    ) -> Self {
        Self {
            phone_number,
            contact_name,
            scheduled_time,
            created_at: now_millis(),
            status: status.unwrap_or(CallStatus::Scheduled),
            call_type: CallType::Manual,
            booking_date: None,
            booking_time: None,
            num_players: None,
            player_name: None,
        }
    }

    /// Create an AI-agent call task. The task goes straight to
    /// IN_PROGRESS; the record exists before the provider confirms the
    /// call was placed.
    pub fn ai_agent(
        phone_number: String,
        contact_name: String,
        booking_date: String,
        booking_time: String,
        num_players: i32,
        player_name: String,
    ) -> Self {
        let now = now_millis();
        Self {
            phone_number,
            contact_name: Some(contact_name),
            scheduled_time: now,
            created_at: now,
            status: CallStatus::InProgress,
            call_type: CallType::AiAgent,
            booking_date: Some(booking_date),
            booking_time: Some(booking_time),
            num_players: Some(num_players),
            player_name: Some(player_name),
        }
    }

    /// Attach a store-assigned ID, producing the persisted entity.
    pub fn with_id(self, id: i32) -> CallTask {
        CallTask {
            id,
            phone_number: self.phone_number,
            contact_name: self.contact_name,
            scheduled_time: self.scheduled_time,
            created_at: self.created_at,
            status: self.status,
            call_type: self.call_type,
            vapi_call_id: None,
            booking_date: self.booking_date,
            booking_time: self.booking_time,
            num_players: self.num_players,
            player_name: self.player_name,
            transcript: None,
            booking_confirmed: None,
            ai_summary: None,
            ended_reason: None,
        }
    }
}

impl CallTask {
    /// Record the provider-assigned call ID. First writer wins: once set
    /// the ID is never overwritten, so replayed or out-of-order events
    /// cannot re-point the record at a different provider call.
    pub fn assign_provider_call_id(&mut self, provider_call_id: &str) {
        if self.vapi_call_id.is_none() && !provider_call_id.is_empty() {
            self.vapi_call_id = Some(provider_call_id.to_string());
        }
    }

    /// Mark the task failed because the outbound call could not be
    /// placed. The record is kept for visibility into failed attempts.
    pub fn record_provider_failure(&mut self, detail: &str) {
        self.status = CallStatus::Failed;
        self.ai_summary = Some(format!("Failed to initiate call: {detail}"));
    }
}

/// Call task repository trait
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CallTaskRepository: Send + Sync {
    /// Insert a new call task and return it with its assigned ID
    async fn create(&self, new_task: &NewCallTask) -> Result<CallTask, String>;

    /// Update an existing call task
    async fn update(&self, task: &CallTask) -> Result<(), String>;

    /// Get a call task by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<CallTask>, String>;

    /// Get a call task by its provider-assigned call ID
    async fn find_by_provider_call_id(
        &self,
        provider_call_id: &str,
    ) -> Result<Option<CallTask>, String>;

    /// List call tasks, most recently scheduled first
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CallTask>, String>;

    /// Count call tasks
    async fn count(&self) -> Result<i64, String>;

    /// Delete a call task; returns false when no such ID exists
    async fn delete(&self, id: i32) -> Result<bool, String>;
}
