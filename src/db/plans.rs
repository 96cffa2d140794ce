use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{PlanRow, ScorePeriod, ScoreUpdate};

/// Read/write access to the plan rows the scoring subsystem touches.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Scoring-relevant subset of one plan.
    async fn get_plan(&self, plan_id: Uuid) -> Result<Option<PlanRow>, AppError>;

    /// Ids of every plan that has not been canceled.
    async fn active_plan_ids(&self) -> Result<Vec<Uuid>, AppError>;

    /// Persist one scoring pass. Must be a single statement so readers never
    /// observe score columns from different passes.
    async fn update_scores(&self, plan_id: Uuid, update: &ScoreUpdate) -> Result<(), AppError>;

    /// Overwrite the materialized view counters.
    async fn update_view_counts(
        &self,
        plan_id: Uuid,
        view_count: i64,
        unique_view_count: i64,
    ) -> Result<(), AppError>;

    /// Top-N non-canceled, verified plans by the given period's score.
    async fn top_by_period(
        &self,
        period: ScorePeriod,
        limit: i64,
    ) -> Result<Vec<PlanRow>, AppError>;
}

#[derive(Clone)]
pub struct PgPlanStore {
    pool: PgPool,
}

impl PgPlanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanStore for PgPlanStore {
    async fn get_plan(&self, plan_id: Uuid) -> Result<Option<PlanRow>, AppError> {
        sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT * FROM plans
            WHERE id = $1
            "#,
        )
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Fetch)
    }

    async fn active_plan_ids(&self) -> Result<Vec<Uuid>, AppError> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM plans
            WHERE canceled_at IS NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Fetch)
    }

    async fn update_scores(&self, plan_id: Uuid, update: &ScoreUpdate) -> Result<(), AppError> {
        // One statement for all four score columns plus the bookkeeping
        // fields; the canonical score reuses the weekly bind.
        sqlx::query(
            r#"
            UPDATE plans
            SET daily_hotness_score = $2,
                weekly_hotness_score = $3,
                monthly_hotness_score = $4,
                hotness_score = $3,
                last_calculated_at = $5,
                suspicious_activity_detected = $6
            WHERE id = $1
            "#,
        )
        .bind(plan_id)
        .bind(update.scores.daily)
        .bind(update.scores.weekly)
        .bind(update.scores.monthly)
        .bind(update.calculated_at)
        .bind(update.suspicious)
        .execute(&self.pool)
        .await
        .map_err(AppError::Compute)?;

        Ok(())
    }

    async fn update_view_counts(
        &self,
        plan_id: Uuid,
        view_count: i64,
        unique_view_count: i64,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE plans
            SET view_count = $2,
                unique_view_count = $3
            WHERE id = $1
            "#,
        )
        .bind(plan_id)
        .bind(view_count)
        .bind(unique_view_count)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn top_by_period(
        &self,
        period: ScorePeriod,
        limit: i64,
    ) -> Result<Vec<PlanRow>, AppError> {
        // The column name comes from the enum, never from user input.
        let column = period.score_column();
        let query = format!(
            r#"
            SELECT * FROM plans
            WHERE canceled_at IS NULL
              AND verify_status = TRUE
              AND {column} > 0
            ORDER BY {column} DESC
            LIMIT $1
            "#,
        );

        let stream = sqlx::query_as::<_, PlanRow>(&query).bind(limit).fetch(&self.pool);

        stream
            .try_collect::<Vec<_>>()
            .await
            .map_err(AppError::Fetch)
    }
}
