use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::handlers::hotness_handlers::{
    get_home_feed, get_hot_plans, recompute_all_plans, recompute_plan,
};
use crate::handlers::interaction_handlers::record_interaction;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = create_cors_layer(&state.config);

    Router::new()
        .route("/interactions", post(record_interaction))
        .route("/hot_plans", get(get_hot_plans))
        .route("/home_feed", get(get_home_feed))
        .route("/plans/:plan_id/recompute", post(recompute_plan))
        .route("/recompute_all", post(recompute_all_plans))
        .with_state(state)
        .layer(cors)
}

fn create_cors_layer(config: &Config) -> CorsLayer {
    let origins = [config.frontend_url.parse::<HeaderValue>().unwrap()];

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
