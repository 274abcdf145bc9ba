//! PostgreSQL implementation of the call task repository

use crate::domain::call_task::{CallStatus, CallTask, CallTaskRepository, CallType, NewCallTask};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::{debug, error};

const CALL_TASK_COLUMNS: &str = "id, phone_number, contact_name, scheduled_time, created_at, \
     status, call_type, vapi_call_id, booking_date, booking_time, num_players, player_name, \
     transcript, booking_confirmed, ai_summary, ended_reason";

#[derive(FromRow)]
struct CallTaskRow {
    id: i32,
    phone_number: String,
    contact_name: Option<String>,
    scheduled_time: i64,
    created_at: i64,
    status: String,
    call_type: String,
    vapi_call_id: Option<String>,
    booking_date: Option<String>,
    booking_time: Option<String>,
    num_players: Option<i32>,
    player_name: Option<String>,
    transcript: Option<String>,
    booking_confirmed: Option<bool>,
    ai_summary: Option<String>,
    ended_reason: Option<String>,
}

impl From<CallTaskRow> for CallTask {
    fn from(r: CallTaskRow) -> Self {
        CallTask {
            id: r.id,
            phone_number: r.phone_number,
            contact_name: r.contact_name,
            scheduled_time: r.scheduled_time,
            created_at: r.created_at,
            status: CallStatus::from_str(&r.status).unwrap_or(CallStatus::Failed),
            call_type: CallType::from_str(&r.call_type).unwrap_or(CallType::Manual),
            vapi_call_id: r.vapi_call_id,
            booking_date: r.booking_date,
            booking_time: r.booking_time,
            num_players: r.num_players,
            player_name: r.player_name,
            transcript: r.transcript,
            booking_confirmed: r.booking_confirmed,
            ai_summary: r.ai_summary,
            ended_reason: r.ended_reason,
        }
    }
}

pub struct PgCallTaskRepository {
    pool: PgPool,
}

impl PgCallTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CallTaskRepository for PgCallTaskRepository {
    async fn create(&self, new_task: &NewCallTask) -> Result<CallTask, String> {
        debug!("Creating call task for {}", new_task.phone_number);

        let row = sqlx::query_as::<_, CallTaskRow>(&format!(
            r#"
            INSERT INTO call_tasks (
                phone_number, contact_name, scheduled_time, created_at,
                status, call_type,
                booking_date, booking_time, num_players, player_name
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {CALL_TASK_COLUMNS}
            "#
        ))
        .bind(&new_task.phone_number)
        .bind(&new_task.contact_name)
        .bind(new_task.scheduled_time)
        .bind(new_task.created_at)
        .bind(new_task.status.as_str())
        .bind(new_task.call_type.as_str())
        .bind(&new_task.booking_date)
        .bind(&new_task.booking_time)
        .bind(new_task.num_players)
        .bind(&new_task.player_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to create call task: {}", e);
            format!("Database error: {}", e)
        })?;

        debug!("Call task created: {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, task: &CallTask) -> Result<(), String> {
        debug!("Updating call task: {}", task.id);

        let result = sqlx::query(
            r#"
            UPDATE call_tasks
            SET phone_number = $2, contact_name = $3,
                scheduled_time = $4, created_at = $5,
                status = $6, call_type = $7, vapi_call_id = $8,
                booking_date = $9, booking_time = $10,
                num_players = $11, player_name = $12,
                transcript = $13, booking_confirmed = $14,
                ai_summary = $15, ended_reason = $16
            WHERE id = $1
            "#,
        )
        .bind(task.id)
        .bind(&task.phone_number)
        .bind(&task.contact_name)
        .bind(task.scheduled_time)
        .bind(task.created_at)
        .bind(task.status.as_str())
        .bind(task.call_type.as_str())
        .bind(&task.vapi_call_id)
        .bind(&task.booking_date)
        .bind(&task.booking_time)
        .bind(task.num_players)
        .bind(&task.player_name)
        .bind(&task.transcript)
        .bind(task.booking_confirmed)
        .bind(&task.ai_summary)
        .bind(&task.ended_reason)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to update call task: {}", e);
            format!("Database error: {}", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(format!("Call task not found: {}", task.id));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<CallTask>, String> {
        debug!("Getting call task by id: {}", id);

        let row = sqlx::query_as::<_, CallTaskRow>(&format!(
            "SELECT {CALL_TASK_COLUMNS} FROM call_tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to get call task: {}", e);
            format!("Database error: {}", e)
        })?;

        Ok(row.map(Into::into))
    }

    async fn find_by_provider_call_id(
        &self,
        provider_call_id: &str,
    ) -> Result<Option<CallTask>, String> {
        debug!("Getting call task by provider call id: {}", provider_call_id);

        let row = sqlx::query_as::<_, CallTaskRow>(&format!(
            r#"
            SELECT {CALL_TASK_COLUMNS} FROM call_tasks
            WHERE vapi_call_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(provider_call_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to get call task by provider call id: {}", e);
            format!("Database error: {}", e)
        })?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CallTask>, String> {
        debug!("Listing call tasks (limit: {}, offset: {})", limit, offset);

        let rows = sqlx::query_as::<_, CallTaskRow>(&format!(
            r#"
            SELECT {CALL_TASK_COLUMNS} FROM call_tasks
            ORDER BY scheduled_time DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to list call tasks: {}", e);
            format!("Database error: {}", e)
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<i64, String> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM call_tasks")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to count call tasks: {}", e);
                format!("Database error: {}", e)
            })?;

        Ok(count)
    }

    async fn delete(&self, id: i32) -> Result<bool, String> {
        debug!("Deleting call task: {}", id);

        let result = sqlx::query("DELETE FROM call_tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to delete call task: {}", e);
                format!("Database error: {}", e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
