use std::collections::HashMap;

use chrono::Duration;

use crate::models::InteractionEventRow;

/// Tunable suspicion thresholds. The defaults are hand-tuned production
/// values, not derived from anything.
#[derive(Clone, Copy, Debug)]
pub struct AbuseThresholds {
    /// More weekly view events than this with zero join requests.
    pub max_views_without_requests: i64,
    /// More weekly view events than this from a single visitor IP.
    pub max_views_per_ip: i64,
    /// Minimum run length for the burst check.
    pub burst_min_events: usize,
    /// A run of `burst_min_events` consecutive views spanning less than
    /// this is a burst.
    pub burst_window_secs: i64,
}

impl Default for AbuseThresholds {
    fn default() -> Self {
        Self {
            max_views_without_requests: 50,
            max_views_per_ip: 25,
            burst_min_events: 10,
            burst_window_secs: 120,
        }
    }
}

/// Classify a plan's weekly view activity as suspicious or not.
///
/// `views` must already be the qualifying set: the weekly window's
/// non-creator, non-spam view events. Any single trigger marks the plan;
/// the caller applies the flat score penalty.
pub fn is_suspicious(
    views: &[InteractionEventRow],
    join_requests: i64,
    thresholds: &AbuseThresholds,
) -> bool {
    // 1. Lots of eyeballs, nobody asks to join.
    if views.len() as i64 > thresholds.max_views_without_requests && join_requests == 0 {
        return true;
    }

    // 2. One address supplies an outsized share of the views.
    let mut ip_counts: HashMap<&str, i64> = HashMap::new();
    for view in views {
        if let Some(ip) = view.visitor_ip.as_deref() {
            *ip_counts.entry(ip).or_insert(0) += 1;
        }
    }
    if ip_counts.values().any(|&count| count > thresholds.max_views_per_ip) {
        return true;
    }

    // 3. Burst pattern: some run of N consecutive views lands inside the
    // burst window.
    if views.len() >= thresholds.burst_min_events {
        let mut timestamps: Vec<_> = views.iter().map(|v| v.created_at).collect();
        timestamps.sort();

        let burst_span = Duration::seconds(thresholds.burst_window_secs);
        for i in (thresholds.burst_min_events - 1)..timestamps.len() {
            let run_span = timestamps[i] - timestamps[i + 1 - thresholds.burst_min_events];
            if run_span < burst_span {
                return true;
            }
        }
    }

    false
}
