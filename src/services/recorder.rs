use chrono::{Duration, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{InteractionType, NewInteractionEvent, RecordOutcome};
use crate::services::{hotness, scoring};
use crate::state::AppState;

/// Sentinel address when no network origin is available.
pub const FALLBACK_VISITOR_IP: &str = "0.0.0.0";

/// Spam rate checks look at the trailing hour.
const RATE_WINDOW_HOURS: i64 = 1;

/// Who performed the interaction, resolved at the transport boundary.
#[derive(Clone, Debug)]
pub struct ActorIdentity {
    pub user_id: Option<Uuid>,
    pub visitor_ip: String,
}

/// Record one interaction event and, for fresh non-spam views, kick off the
/// counter recount and an immediate scoring pass.
pub async fn record_interaction(
    state: &AppState,
    actor: ActorIdentity,
    plan_id: &str,
    interaction_type: InteractionType,
    session_id: Option<String>,
) -> Result<RecordOutcome, AppError> {
    if plan_id.trim().is_empty() {
        return Err(AppError::Validation("plan id is required".to_string()));
    }
    let plan_id = Uuid::parse_str(plan_id)
        .map_err(|e| AppError::Validation(format!("invalid plan id: {e}")))?;

    let plan = state
        .plans
        .get_plan(plan_id)
        .await?
        .ok_or_else(|| AppError::Validation(format!("unknown plan {plan_id}")))?;

    // Session ids group one visitor's sequence of actions; generate one if
    // the client didn't send theirs.
    let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());

    // The owner looking at their own plan is recorded, but under a creator
    // label that nothing downstream aggregates, and triggers nothing.
    if actor.user_id == Some(plan.user_id) {
        state
            .events
            .insert_event(&NewInteractionEvent {
                plan_id,
                user_id: actor.user_id,
                visitor_ip: Some(actor.visitor_ip),
                event_type: interaction_type.creator_label(),
                session_id: session_id.clone(),
                is_creator_view: true,
                is_potential_spam: false,
            })
            .await?;

        return Ok(RecordOutcome {
            success: true,
            session_id,
            is_creator_view: true,
            is_potential_spam: false,
        });
    }

    let rate_window_start = Utc::now() - Duration::hours(RATE_WINDOW_HOURS);
    let recent = state
        .events
        .count_recent_by_identity(
            plan_id,
            actor.user_id,
            &actor.visitor_ip,
            interaction_type.as_str(),
            rate_window_start,
        )
        .await?;
    let is_potential_spam = recent > state.config.spam_rate_limit;

    state
        .events
        .insert_event(&NewInteractionEvent {
            plan_id,
            user_id: actor.user_id,
            visitor_ip: Some(actor.visitor_ip),
            event_type: interaction_type.as_str().to_string(),
            session_id: session_id.clone(),
            is_creator_view: false,
            is_potential_spam,
        })
        .await?;

    // The event is durable at this point. The follow-on recount and scoring
    // pass each fail independently without taking the request down.
    if interaction_type == InteractionType::View && !is_potential_spam {
        if let Err(e) = refresh_view_counts(state, plan_id).await {
            warn!("View count refresh failed for plan {plan_id}: {e}");
        }
        if let Err(e) = scoring::recompute_one(state, plan_id).await {
            warn!("Scoring pass failed for plan {plan_id}: {e}");
        }
    }

    Ok(RecordOutcome {
        success: true,
        session_id,
        is_creator_view: false,
        is_potential_spam,
    })
}

/// Recount the materialized view counters from the qualifying view events.
pub async fn refresh_view_counts(state: &AppState, plan_id: Uuid) -> Result<(), AppError> {
    let views = state.events.all_view_events(plan_id).await?;
    let view_refs: Vec<_> = views.iter().collect();
    let unique = hotness::unique_viewers(&view_refs);

    state
        .plans
        .update_view_counts(plan_id, views.len() as i64, unique as i64)
        .await
}
