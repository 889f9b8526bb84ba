//! Health monitoring types

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub snapshot_ready: bool,
    pub stale: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub snapshot_age_secs: Option<i64>,
    pub refresh_in_flight: bool,
    pub successful_refreshes: u64,
    pub failed_refreshes: u64,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
    pub uptime_seconds: u64,
}
