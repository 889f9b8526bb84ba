//! Health monitoring utilities

use chrono::Utc;
use std::time::{Duration, Instant};
use crate::{
    service::RefreshStats,
    types::{HealthStatus, SnapshotState},
};

pub fn run_health_check(
    state: &SnapshotState,
    stats: &RefreshStats,
    refresh_in_flight: bool,
    start_time: Instant,
    stale_after: Duration,
) -> HealthStatus {
    let snapshot = state.ready();
    let age_secs = snapshot.map(|s| (Utc::now() - s.last_updated).num_seconds().max(0));

    HealthStatus {
        snapshot_ready: snapshot.is_some(),
        stale: age_secs
            .map(|age| age as u64 >= stale_after.as_secs())
            .unwrap_or(true),
        last_updated: snapshot.map(|s| s.last_updated),
        snapshot_age_secs: age_secs,
        refresh_in_flight,
        successful_refreshes: stats.successes,
        failed_refreshes: stats.failures,
        consecutive_failures: stats.consecutive_failures,
        last_error: stats.last_error.clone(),
        uptime_seconds: start_time.elapsed().as_secs(),
    }
}
