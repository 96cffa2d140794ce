use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::db::{
    EngagementStore, InteractionEventStore, PgEngagementStore, PgInteractionEventStore,
    PgPlanStore, PlanStore,
};
use crate::feed_cache::FeedCache;

/// Shared application state: config, the injected store collaborators, and
/// the feed cache. Cheap to clone into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub plans: Arc<dyn PlanStore>,
    pub events: Arc<dyn InteractionEventStore>,
    pub engagement: Arc<dyn EngagementStore>,
    pub feed_cache: Arc<FeedCache>,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self {
            config: Arc::new(config),
            plans: Arc::new(PgPlanStore::new(pool.clone())),
            events: Arc::new(PgInteractionEventStore::new(pool.clone())),
            engagement: Arc::new(PgEngagementStore::new(pool)),
            feed_cache: Arc::new(FeedCache::new()),
        }
    }
}
