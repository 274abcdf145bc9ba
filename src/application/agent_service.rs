//! AI agent call orchestration
//!
//! Coordinates record creation and provider invocation as one logical,
//! deliberately non-transactional operation. The record is persisted
//! before the provider is contacted, so a failed placement leaves an
//! inspectable record rather than nothing. A crash between the insert
//! and the provider response leaves an IN_PROGRESS record with no
//! provider call ID, resolvable only by manual inspection. This is
//! best-effort bookkeeping, not a transaction.

use crate::domain::call_task::{CallTask, CallTaskRepository, NewCallTask};
use crate::domain::error::{DomainError, Result};
use crate::domain::provider::{OutboundCallSpec, VoiceProvider};
use crate::domain::reconcile::ProviderSignal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

const DEFAULT_NUM_PLAYERS: i32 = 2;
const DEFAULT_PLAYER_NAME: &str = "Guest";

/// Request to place an AI-agent booking call.
#[derive(Debug, Clone, Deserialize)]
pub struct AiAgentCallRequest {
    pub phone_number: String,
    pub booking_date: String,
    pub booking_time: String,
    #[serde(default)]
    pub num_players: Option<i32>,
    #[serde(default)]
    pub player_name: Option<String>,
}

/// What happened to an inbound provider event.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookDisposition {
    /// The event was matched to a record and applied
    Applied { call_id: i32 },
    /// The event matched a record but carried nothing to act on
    NoOp { call_id: i32 },
    /// The event matched no record and was discarded
    Ignored { reason: &'static str },
}

pub struct AgentService {
    repo: Arc<dyn CallTaskRepository>,
    provider: Arc<dyn VoiceProvider>,
    course_name: String,
}

impl AgentService {
    pub fn new(
        repo: Arc<dyn CallTaskRepository>,
        provider: Arc<dyn VoiceProvider>,
        course_name: String,
    ) -> Self {
        Self {
            repo,
            provider,
            course_name,
        }
    }

    /// Create a call task and place the outbound call with the provider.
    ///
    /// On provider failure the task is kept, marked FAILED with the
    /// failure detail in its summary, and the provider error is returned
    /// to the caller.
    pub async fn create_ai_agent_call(&self, request: AiAgentCallRequest) -> Result<CallTask> {
        validate_required(&request.phone_number, "phone_number")?;
        validate_required(&request.booking_date, "booking_date")?;
        validate_required(&request.booking_time, "booking_time")?;

        let num_players = request.num_players.unwrap_or(DEFAULT_NUM_PLAYERS);
        let player_name = request
            .player_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string());

        let new_task = NewCallTask::ai_agent(
            request.phone_number.clone(),
            self.course_name.clone(),
            request.booking_date.clone(),
            request.booking_time.clone(),
            num_players,
            player_name.clone(),
        );
        let mut task = self.repo.create(&new_task).await.map_err(DomainError::Database)?;
        info!("Created AI agent call task {}", task.id);

        let spec = OutboundCallSpec {
            phone_number: request.phone_number,
            booking_date: request.booking_date,
            booking_time: request.booking_time,
            num_players,
            player_name,
            internal_call_id: task.id,
        };

        match self.provider.place_call(&spec).await {
            Ok(provider_call_id) => {
                if let Some(id) = provider_call_id.as_deref() {
                    task.assign_provider_call_id(id);
                }
                self.repo.update(&task).await.map_err(DomainError::Database)?;
                info!(
                    "Placed provider call {:?} for task {}",
                    task.vapi_call_id, task.id
                );
                Ok(task)
            }
            Err(detail) => {
                error!("Provider call failed for task {}: {}", task.id, detail);
                task.record_provider_failure(&detail);
                if let Err(e) = self.repo.update(&task).await {
                    error!("Failed to record provider failure on task {}: {}", task.id, e);
                }
                Err(DomainError::Provider(detail))
            }
        }
    }

    /// Look up a call task by ID.
    pub async fn get_call_status(&self, id: i32) -> Result<CallTask> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(DomainError::Database)?
            .ok_or(DomainError::NotFound(id))
    }

    /// Poll the provider for the call's current state and reconcile it
    /// onto the task.
    pub async fn refresh_call(&self, id: i32) -> Result<CallTask> {
        let mut task = self.get_call_status(id).await?;
        let provider_call_id = task.vapi_call_id.clone().ok_or_else(|| {
            DomainError::InvalidState(format!("call {id} has no provider call ID"))
        })?;

        let signal = self
            .provider
            .fetch_signal(&provider_call_id)
            .await
            .map_err(DomainError::Provider)?;

        task.apply_signal(&signal);
        self.repo.update(&task).await.map_err(DomainError::Database)?;
        Ok(task)
    }

    /// Reconcile an inbound provider event onto its call task.
    ///
    /// Lookup prefers the correlation ID we embedded in outbound
    /// metadata; events without one (or whose ID matches nothing) fall
    /// back to the stored provider call ID. Events matching neither are
    /// discarded; the provider sends events for calls this system never
    /// fully registered or has already deleted.
    pub async fn process_provider_event(
        &self,
        correlation_id: Option<i32>,
        provider_call_id: Option<&str>,
        signal: ProviderSignal,
    ) -> Result<WebhookDisposition> {
        let mut task = match self.locate(correlation_id, provider_call_id).await? {
            Some(task) => task,
            None => {
                warn!(
                    "Discarding provider event for unknown call (correlation {:?}, provider id {:?})",
                    correlation_id, provider_call_id
                );
                return Ok(WebhookDisposition::Ignored {
                    reason: "call not found",
                });
            }
        };

        if signal == ProviderSignal::Unrecognized {
            return Ok(WebhookDisposition::NoOp { call_id: task.id });
        }

        if let Some(id) = provider_call_id {
            task.assign_provider_call_id(id);
        }
        task.apply_signal(&signal);
        self.repo.update(&task).await.map_err(DomainError::Database)?;
        info!("Applied provider event to task {}: {}", task.id, task.status.as_str());

        Ok(WebhookDisposition::Applied { call_id: task.id })
    }

    async fn locate(
        &self,
        correlation_id: Option<i32>,
        provider_call_id: Option<&str>,
    ) -> Result<Option<CallTask>> {
        if let Some(id) = correlation_id {
            if let Some(task) = self
                .repo
                .find_by_id(id)
                .await
                .map_err(DomainError::Database)?
            {
                return Ok(Some(task));
            }
        }
        if let Some(provider_id) = provider_call_id {
            if let Some(task) = self
                .repo
                .find_by_provider_call_id(provider_id)
                .await
                .map_err(DomainError::Database)?
            {
                return Ok(Some(task));
            }
        }
        Ok(None)
    }
}

fn validate_required(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    Ok(())
}
