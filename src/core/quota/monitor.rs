//! Sliding-window quota monitor

use super::types::QuotaStats;
use crate::config::QuotaConfig;
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Advisory request quota over two sliding windows (per-minute, per-hour)
///
/// The monitor does not enforce the gate itself: callers check
/// [`can_make_request`](Self::can_make_request) before recording. Both
/// timestamp sequences are insertion-ordered, so pruning expired entries is
/// a prefix trim. State is process-local and resets on restart.
#[derive(Debug)]
pub struct QuotaMonitor {
    config: QuotaConfig,
    minute_window: Duration,
    hour_window: Duration,
    inner: Mutex<Windows>,
}

#[derive(Debug, Default)]
struct Windows {
    minute: Vec<Instant>,
    hour: Vec<Instant>,
    total: u64,
}

impl Windows {
    /// Prefix-trim entries older than each window
    fn prune(&mut self, now: Instant, minute_window: Duration, hour_window: Duration) {
        let minute_cut = self
            .minute
            .partition_point(|&t| now.duration_since(t) >= minute_window);
        self.minute.drain(..minute_cut);

        let hour_cut = self
            .hour
            .partition_point(|&t| now.duration_since(t) >= hour_window);
        self.hour.drain(..hour_cut);
    }
}

impl QuotaMonitor {
    /// Create a monitor with the standard 60s / 3600s windows
    pub fn new(config: QuotaConfig) -> Self {
        Self::with_windows(
            config,
            Duration::from_secs(60),
            Duration::from_secs(3600),
        )
    }

    /// Create a monitor with custom window durations
    pub fn with_windows(config: QuotaConfig, minute_window: Duration, hour_window: Duration) -> Self {
        Self {
            config,
            minute_window,
            hour_window,
            inner: Mutex::new(Windows::default()),
        }
    }

    /// Whether a new AI request may be issued right now
    pub fn can_make_request(&self) -> bool {
        let now = Instant::now();
        let mut windows = self.inner.lock();
        windows.prune(now, self.minute_window, self.hour_window);

        let allowed = (windows.minute.len() as u32) < self.config.max_per_minute
            && (windows.hour.len() as u32) < self.config.max_per_hour;

        if !allowed {
            debug!(
                minute = windows.minute.len(),
                hour = windows.hour.len(),
                "quota exhausted"
            );
        }
        allowed
    }

    /// Record an accepted request in both windows
    ///
    /// Appends unconditionally: callers must have checked
    /// [`can_make_request`](Self::can_make_request) first.
    pub fn record_request(&self) {
        let now = Instant::now();
        let mut windows = self.inner.lock();
        windows.minute.push(now);
        windows.hour.push(now);
        windows.total += 1;
    }

    /// Snapshot of current usage and reset ETAs
    pub fn stats(&self) -> QuotaStats {
        let now = Instant::now();
        let mut windows = self.inner.lock();
        windows.prune(now, self.minute_window, self.hour_window);

        let recent = windows.minute.len() as u32;
        let hourly = windows.hour.len() as u32;
        let remaining_minute = self.config.max_per_minute.saturating_sub(recent);
        let remaining_hour = self.config.max_per_hour.saturating_sub(hourly);

        QuotaStats {
            total_requests: windows.total,
            recent_requests: recent,
            hourly_requests: hourly,
            remaining_quota: remaining_minute.min(remaining_hour),
            quota_reset_in: Self::reset_in(&windows.minute, now, self.minute_window),
            hourly_reset_in: Self::reset_in(&windows.hour, now, self.hour_window),
        }
    }

    /// Seconds until the oldest entry in a window expires, 0 when empty
    fn reset_in(window: &[Instant], now: Instant, duration: Duration) -> u64 {
        window
            .first()
            .map(|&oldest| {
                duration
                    .saturating_sub(now.duration_since(oldest))
                    .as_secs()
            })
            .unwrap_or(0)
    }
}
