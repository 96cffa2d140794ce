use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::InteractionEventRow;
use crate::state::AppState;

const TOTAL_VIEWS_WEIGHT: f64 = 0.2;
const UNIQUE_VIEWERS_WEIGHT: f64 = 0.3;
const RECENCY_WEIGHT: f64 = 0.2;
const ENGAGEMENT_WEIGHT: f64 = 0.3;

/// A join request counts as two views, an accepted participant as three.
const JOIN_REQUEST_VALUE: f64 = 2.0;
const PARTICIPANT_VALUE: f64 = 3.0;

/// Recency weight decays linearly to zero over 7 days, in every window.
const RECENCY_HORIZON_HOURS: f64 = 168.0;

/// Any window with activity scores at least this much.
const MIN_ACTIVE_SCORE: f64 = 0.1;

/// Everything one lookback window feeds into the formula.
pub struct WindowData {
    pub events: Vec<InteractionEventRow>,
    pub join_requests: i64,
    pub participants: i64,
}

/// Fetch one window's qualifying events plus engagement counts. The three
/// sub-fetches have no ordering dependency.
pub async fn fetch_window(
    state: &AppState,
    plan_id: Uuid,
    window_start: DateTime<Utc>,
) -> Result<WindowData, AppError> {
    let (events, join_requests, participants) = tokio::try_join!(
        state.events.scoring_events_since(plan_id, window_start),
        state.engagement.join_requests_since(plan_id, window_start),
        state.engagement.participants_since(plan_id, window_start),
    )?;

    Ok(WindowData {
        events,
        join_requests,
        participants,
    })
}

/// Distinct viewer identities (user id when present, visitor IP otherwise)
/// among the given view events.
pub fn unique_viewers(views: &[&InteractionEventRow]) -> usize {
    let mut identities = HashSet::new();
    for view in views {
        if let Some(identity) = view.viewer_identity() {
            identities.insert(identity);
        }
    }
    identities.len()
}

/// The per-window hotness formula. Only view-type events count; join
/// requests and participants enter through the engagement term.
pub fn window_score(data: &WindowData, now: DateTime<Utc>) -> f64 {
    let views: Vec<&InteractionEventRow> = data.events.iter().filter(|e| e.is_view()).collect();

    let total_views = views.len();
    if total_views == 0 && data.join_requests == 0 && data.participants == 0 {
        return 0.0;
    }

    let unique_viewer_count = unique_viewers(&views);

    let mut recency_score = 0.0;
    for view in &views {
        let hours_ago = (now - view.created_at).num_milliseconds() as f64 / 3_600_000.0;
        recency_score += (1.0 - hours_ago / RECENCY_HORIZON_HOURS).max(0.0);
    }

    let engagement_score =
        data.join_requests as f64 * JOIN_REQUEST_VALUE + data.participants as f64 * PARTICIPANT_VALUE;

    let raw = total_views as f64 * TOTAL_VIEWS_WEIGHT
        + unique_viewer_count as f64 * UNIQUE_VIEWERS_WEIGHT
        + recency_score * RECENCY_WEIGHT
        + engagement_score * ENGAGEMENT_WEIGHT;

    floor_active_score(raw)
}

/// Guarantee that any activity yields a visibly non-zero score.
fn floor_active_score(raw: f64) -> f64 {
    if raw > 0.0 && raw < MIN_ACTIVE_SCORE {
        MIN_ACTIVE_SCORE
    } else {
        raw
    }
}
