use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::feed_cache::FeedTarget;
use crate::models::{BatchSummary, PlanRow, ScorePeriod, WindowScores};
use crate::services::scoring;
use crate::state::AppState;

const DEFAULT_HOT_PLANS_LIMIT: i64 = 5;

#[derive(Deserialize)]
pub struct HotPlansQuery {
    pub period: Option<ScorePeriod>,
    pub limit: Option<i64>,
}

/// Top-N plans for a period, served through the feed cache.
pub async fn get_hot_plans(
    State(state): State<AppState>,
    Query(params): Query<HotPlansQuery>,
) -> Result<Json<Vec<PlanRow>>, AppError> {
    let period = params.period.unwrap_or(ScorePeriod::Weekly);
    let limit = params.limit.unwrap_or(DEFAULT_HOT_PLANS_LIMIT);

    let plans = ranked_listing(&state, FeedTarget::HotPlans, period, limit).await?;
    Ok(Json(plans))
}

/// The home screen's default listing: weekly top five.
pub async fn get_home_feed(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlanRow>>, AppError> {
    let plans = ranked_listing(
        &state,
        FeedTarget::Home,
        ScorePeriod::Weekly,
        DEFAULT_HOT_PLANS_LIMIT,
    )
    .await?;
    Ok(Json(plans))
}

async fn ranked_listing(
    state: &AppState,
    target: FeedTarget,
    period: ScorePeriod,
    limit: i64,
) -> Result<Vec<PlanRow>, AppError> {
    if let Some(cached) = state.feed_cache.get(target, period, limit).await {
        return Ok(cached.as_ref().clone());
    }

    let plans = state.plans.top_by_period(period, limit).await?;
    let cached = state.feed_cache.put(target, period, limit, plans).await;
    Ok(cached.as_ref().clone())
}

pub async fn recompute_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<WindowScores>, AppError> {
    let scores = scoring::recompute_one(&state, plan_id).await?;
    Ok(Json(scores))
}

/// Manual trigger for a full scoring sweep.
pub async fn recompute_all_plans(
    State(state): State<AppState>,
) -> Result<Json<BatchSummary>, AppError> {
    let summary = scoring::recompute_all(&state).await?;
    Ok(Json(summary))
}
