use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{InteractionType, RecordOutcome};
use crate::services::recorder::{self, ActorIdentity, FALLBACK_VISITOR_IP};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RecordInteractionBody {
    pub plan_id: String,
    #[serde(default = "default_interaction_type")]
    pub interaction_type: InteractionType,
    pub session_id: Option<String>,
}

fn default_interaction_type() -> InteractionType {
    InteractionType::View
}

pub async fn record_interaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RecordInteractionBody>,
) -> Result<Json<RecordOutcome>, AppError> {
    let actor = resolve_identity(&headers);
    debug!(
        "Recording {:?} on plan {} from {}",
        body.interaction_type, body.plan_id, actor.visitor_ip
    );

    let outcome = recorder::record_interaction(
        &state,
        actor,
        &body.plan_id,
        body.interaction_type,
        body.session_id,
    )
    .await?;

    Ok(Json(outcome))
}

/// Resolve the acting identity at the transport boundary: the surrounding
/// app's auth layer forwards the user id in a header, anonymous visitors
/// fall back to their network-origin address.
fn resolve_identity(headers: &HeaderMap) -> ActorIdentity {
    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok());

    let visitor_ip = headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| FALLBACK_VISITOR_IP.to_string());

    ActorIdentity { user_id, visitor_ip }
}
