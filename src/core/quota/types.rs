//! Quota monitor types

use serde::Serialize;

/// Snapshot of current quota usage across both windows
#[derive(Debug, Clone, Serialize)]
pub struct QuotaStats {
    /// Requests recorded since process start
    pub total_requests: u64,
    /// Requests inside the per-minute window
    pub recent_requests: u32,
    /// Requests inside the per-hour window
    pub hourly_requests: u32,
    /// Requests still allowed (min of both windows' remaining allowance)
    pub remaining_quota: u32,
    /// Seconds until the oldest request leaves the minute window
    pub quota_reset_in: u64,
    /// Seconds until the oldest request leaves the hour window
    pub hourly_reset_in: u64,
}
