use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{PlanRow, ScorePeriod};

/// The two listings that consume computed scores. A scoring pass marks both
/// stale so they re-read on their next request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeedTarget {
    Home,
    HotPlans,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct FeedKey {
    target: FeedTarget,
    period: ScorePeriod,
    limit: i64,
}

/// In-process cache of ranked plan listings.
#[derive(Default)]
pub struct FeedCache {
    entries: RwLock<HashMap<FeedKey, Arc<Vec<PlanRow>>>>,
}

impl FeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(
        &self,
        target: FeedTarget,
        period: ScorePeriod,
        limit: i64,
    ) -> Option<Arc<Vec<PlanRow>>> {
        let entries = self.entries.read().await;
        entries.get(&FeedKey { target, period, limit }).cloned()
    }

    pub async fn put(
        &self,
        target: FeedTarget,
        period: ScorePeriod,
        limit: i64,
        plans: Vec<PlanRow>,
    ) -> Arc<Vec<PlanRow>> {
        let plans = Arc::new(plans);
        let mut entries = self.entries.write().await;
        entries.insert(FeedKey { target, period, limit }, plans.clone());
        plans
    }

    /// Drop every cached listing for one target.
    pub async fn mark_stale(&self, target: FeedTarget) {
        let mut entries = self.entries.write().await;
        entries.retain(|key, _| key.target != target);
    }
}
