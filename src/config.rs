use std::{env, fmt::Display, str::FromStr};

use anyhow::Result;
use dotenv::dotenv;
use tracing::warn;

use crate::services::abuse::AbuseThresholds;

pub struct Config {
    pub database_url: String,
    pub server_address: String,
    pub frontend_url: String,
    /// More than this many same-type events from one identity on one plan
    /// within the trailing hour marks the next event as potential spam.
    pub spam_rate_limit: i64,
    pub abuse: AbuseThresholds,
}

pub fn load_config() -> Result<Config> {
    dotenv().ok();

    let database_url = env::var("DATABASE_URL")?;
    let server_address = env::var("SERVER_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

    // Hand-tuned policy knobs, overridable per deployment.
    let abuse = AbuseThresholds {
        max_views_without_requests: try_load("ABUSE_MAX_VIEWS_WITHOUT_REQUESTS", "50"),
        max_views_per_ip: try_load("ABUSE_MAX_VIEWS_PER_IP", "25"),
        burst_min_events: try_load("ABUSE_BURST_MIN_EVENTS", "10"),
        burst_window_secs: try_load("ABUSE_BURST_WINDOW_SECS", "120"),
    };

    Ok(Config {
        database_url,
        server_address,
        frontend_url,
        spam_rate_limit: try_load("SPAM_RATE_LIMIT", "5"),
        abuse,
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());

    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value ({e}), using default: {default}");
        default.parse().unwrap_or_else(|_| panic!("bad default for {key}"))
    })
}
