use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of action a visitor took on a plan.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    View,
    Click,
    Request,
    JoinRequest,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::View => "view",
            InteractionType::Click => "click",
            InteractionType::Request => "request",
            InteractionType::JoinRequest => "join_request",
        }
    }

    /// Event-type label for the plan owner's own interactions. Creator rows
    /// keep a distinct label so no aggregation ever matches them as plain
    /// views, on top of the `is_creator_view` flag.
    pub fn creator_label(&self) -> String {
        format!("{}_creator", self.as_str())
    }
}

#[derive(Deserialize, Serialize, FromRow, Clone, Debug)]
pub struct InteractionEventRow {
    pub id: i64,
    pub plan_id: Uuid,
    pub user_id: Option<Uuid>,
    pub visitor_ip: Option<String>,
    pub event_type: String,
    pub session_id: String,
    pub is_creator_view: bool,
    pub is_potential_spam: bool,
    pub created_at: DateTime<Utc>,
}

impl InteractionEventRow {
    pub fn is_view(&self) -> bool {
        self.event_type == InteractionType::View.as_str()
    }

    /// Identity key used for unique-viewer sets: the user id when the actor
    /// was authenticated, the visitor IP otherwise.
    pub fn viewer_identity(&self) -> Option<String> {
        self.user_id
            .map(|id| id.to_string())
            .or_else(|| self.visitor_ip.clone())
    }
}

/// Insert payload for a new interaction event. Both flags are decided here,
/// once; rows are immutable afterwards.
#[derive(Clone, Debug)]
pub struct NewInteractionEvent {
    pub plan_id: Uuid,
    pub user_id: Option<Uuid>,
    pub visitor_ip: Option<String>,
    pub event_type: String,
    pub session_id: String,
    pub is_creator_view: bool,
    pub is_potential_spam: bool,
}

/// Scoring-relevant subset of a plan row.
#[derive(Deserialize, Serialize, FromRow, Clone, Debug)]
pub struct PlanRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub max_participants: i32,
    pub canceled_at: Option<DateTime<Utc>>,
    pub verify_status: bool,
    pub view_count: i64,
    pub unique_view_count: i64,
    pub daily_hotness_score: f64,
    pub weekly_hotness_score: f64,
    pub monthly_hotness_score: f64,
    pub hotness_score: f64,
    pub last_calculated_at: Option<DateTime<Utc>>,
    pub suspicious_activity_detected: bool,
}

/// One hotness score per lookback window.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct WindowScores {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
}

/// Everything one scoring pass persists. The store writes this in a single
/// statement; the canonical `hotness_score` column is bound to `weekly`.
#[derive(Clone, Copy, Debug)]
pub struct ScoreUpdate {
    pub scores: WindowScores,
    pub suspicious: bool,
    pub calculated_at: DateTime<Utc>,
}

/// Lookback window selector for the hot-plans listing.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScorePeriod {
    Daily,
    Weekly,
    Monthly,
}

impl ScorePeriod {
    pub fn score_column(&self) -> &'static str {
        match self {
            ScorePeriod::Daily => "daily_hotness_score",
            ScorePeriod::Weekly => "weekly_hotness_score",
            ScorePeriod::Monthly => "monthly_hotness_score",
        }
    }
}

/// What the recorder reports back to the client.
#[derive(Serialize, Clone, Debug)]
pub struct RecordOutcome {
    pub success: bool,
    pub session_id: String,
    pub is_creator_view: bool,
    pub is_potential_spam: bool,
}

/// Result of a full scoring sweep.
#[derive(Serialize, Clone, Copy, Debug)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}
