use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{InteractionEventRow, NewInteractionEvent};

/// Append-only store of raw interaction events.
#[async_trait]
pub trait InteractionEventStore: Send + Sync {
    /// Record one event. Rows are never updated or deleted afterwards.
    async fn insert_event(
        &self,
        event: &NewInteractionEvent,
    ) -> Result<InteractionEventRow, AppError>;

    /// Prior events from one identity with the same type on the same plan
    /// since `since`. Authenticated actors match on user id, anonymous ones
    /// on visitor IP.
    async fn count_recent_by_identity(
        &self,
        plan_id: Uuid,
        user_id: Option<Uuid>,
        visitor_ip: &str,
        event_type: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError>;

    /// Events that qualify for aggregation: non-creator, non-spam, created
    /// at or after `since`.
    async fn scoring_events_since(
        &self,
        plan_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<InteractionEventRow>, AppError>;

    /// Every qualifying view event for a plan, for recounting the
    /// materialized view counters.
    async fn all_view_events(&self, plan_id: Uuid) -> Result<Vec<InteractionEventRow>, AppError>;
}

#[derive(Clone)]
pub struct PgInteractionEventStore {
    pool: PgPool,
}

impl PgInteractionEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InteractionEventStore for PgInteractionEventStore {
    async fn insert_event(
        &self,
        event: &NewInteractionEvent,
    ) -> Result<InteractionEventRow, AppError> {
        let row = sqlx::query_as::<_, InteractionEventRow>(
            r#"
            INSERT INTO plan_interactions (
                plan_id, user_id, visitor_ip, event_type,
                session_id, is_creator_view, is_potential_spam
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(event.plan_id)
        .bind(event.user_id)
        .bind(&event.visitor_ip)
        .bind(&event.event_type)
        .bind(&event.session_id)
        .bind(event.is_creator_view)
        .bind(event.is_potential_spam)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn count_recent_by_identity(
        &self,
        plan_id: Uuid,
        user_id: Option<Uuid>,
        visitor_ip: &str,
        event_type: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM plan_interactions
            WHERE plan_id = $1
              AND event_type = $2
              AND created_at >= $3
              AND (
                    ($4::uuid IS NOT NULL AND user_id = $4)
                 OR ($4::uuid IS NULL AND visitor_ip = $5)
              )
            "#,
        )
        .bind(plan_id)
        .bind(event_type)
        .bind(since)
        .bind(user_id)
        .bind(visitor_ip)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Fetch)
    }

    async fn scoring_events_since(
        &self,
        plan_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<InteractionEventRow>, AppError> {
        sqlx::query_as::<_, InteractionEventRow>(
            r#"
            SELECT * FROM plan_interactions
            WHERE plan_id = $1
              AND is_creator_view = FALSE
              AND is_potential_spam = FALSE
              AND created_at >= $2
            "#,
        )
        .bind(plan_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Fetch)
    }

    async fn all_view_events(&self, plan_id: Uuid) -> Result<Vec<InteractionEventRow>, AppError> {
        sqlx::query_as::<_, InteractionEventRow>(
            r#"
            SELECT * FROM plan_interactions
            WHERE plan_id = $1
              AND event_type = 'view'
              AND is_creator_view = FALSE
              AND is_potential_spam = FALSE
            "#,
        )
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Fetch)
    }
}
