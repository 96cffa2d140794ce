use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::feed_cache::FeedTarget;
use crate::models::{BatchSummary, ScoreUpdate, WindowScores};
use crate::services::{abuse, hotness};
use crate::state::AppState;

/// Flat multiplier applied to every window score of a suspicious pass.
const SUSPICION_PENALTY: f64 = 0.5;

/// Recompute and persist all window scores for one plan.
///
/// The three window fetches run concurrently; the row update is issued only
/// after every window and the abuse check have resolved, as one statement.
pub async fn recompute_one(state: &AppState, plan_id: Uuid) -> Result<WindowScores, AppError> {
    if state.plans.get_plan(plan_id).await?.is_none() {
        return Err(AppError::Fetch(sqlx::Error::RowNotFound));
    }

    let now = Utc::now();
    let (daily, weekly, monthly) = tokio::try_join!(
        hotness::fetch_window(state, plan_id, now - Duration::days(1)),
        hotness::fetch_window(state, plan_id, now - Duration::days(7)),
        hotness::fetch_window(state, plan_id, now - Duration::days(30)),
    )?;

    let raw = WindowScores {
        daily: hotness::window_score(&daily, now),
        weekly: hotness::window_score(&weekly, now),
        monthly: hotness::window_score(&monthly, now),
    };

    // Suspicion is judged on the weekly window's view activity alone.
    let weekly_views: Vec<_> = weekly.events.iter().filter(|e| e.is_view()).cloned().collect();
    let suspicious = abuse::is_suspicious(&weekly_views, weekly.join_requests, &state.config.abuse);

    let factor = if suspicious { SUSPICION_PENALTY } else { 1.0 };
    let scores = WindowScores {
        daily: raw.daily * factor,
        weekly: raw.weekly * factor,
        monthly: raw.monthly * factor,
    };

    state
        .plans
        .update_scores(
            plan_id,
            &ScoreUpdate {
                scores,
                suspicious,
                calculated_at: now,
            },
        )
        .await?;

    state.feed_cache.mark_stale(FeedTarget::Home).await;
    state.feed_cache.mark_stale(FeedTarget::HotPlans).await;

    Ok(scores)
}

/// Recompute every non-canceled plan, sequentially. One plan's failure is
/// logged and skipped; the sweep itself succeeds if it finishes iterating.
pub async fn recompute_all(state: &AppState) -> Result<BatchSummary, AppError> {
    let plan_ids = state.plans.active_plan_ids().await?;
    info!("Recomputing hotness scores for {} plans", plan_ids.len());

    let mut failed = 0;
    for plan_id in &plan_ids {
        if let Err(e) = recompute_one(state, *plan_id).await {
            warn!("Skipping plan {plan_id} in hotness sweep: {e}");
            failed += 1;
        }
    }

    state.feed_cache.mark_stale(FeedTarget::Home).await;
    state.feed_cache.mark_stale(FeedTarget::HotPlans).await;
    info!("Hotness sweep complete ({failed} failures)");

    Ok(BatchSummary {
        processed: plan_ids.len(),
        failed,
    })
}
