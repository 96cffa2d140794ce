use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

/// Count-only access to join requests and accepted participants. These are
/// never materialized into the plan row; scoring fetches them fresh per
/// window.
#[async_trait]
pub trait EngagementStore: Send + Sync {
    async fn join_requests_since(
        &self,
        plan_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError>;

    async fn participants_since(
        &self,
        plan_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError>;
}

#[derive(Clone)]
pub struct PgEngagementStore {
    pool: PgPool,
}

impl PgEngagementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EngagementStore for PgEngagementStore {
    async fn join_requests_since(
        &self,
        plan_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM join_requests
            WHERE plan_id = $1
              AND created_at >= $2
            "#,
        )
        .bind(plan_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Fetch)
    }

    async fn participants_since(
        &self,
        plan_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM plan_participants
            WHERE plan_id = $1
              AND joined_at >= $2
            "#,
        )
        .bind(plan_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Fetch)
    }
}
