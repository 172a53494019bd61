//! Tests for the quota monitor

#[cfg(test)]
mod tests {
    use super::super::monitor::QuotaMonitor;
    use crate::config::QuotaConfig;
    use std::time::Duration;

    fn limits(per_minute: u32, per_hour: u32) -> QuotaConfig {
        QuotaConfig {
            max_per_minute: per_minute,
            max_per_hour: per_hour,
        }
    }

    #[test]
    fn allows_within_limits() {
        let monitor = QuotaMonitor::new(limits(8, 15));

        for i in 0..8 {
            assert!(monitor.can_make_request(), "request {} should be allowed", i);
            monitor.record_request();
        }
        assert!(!monitor.can_make_request());
    }

    #[test]
    fn minute_window_blocks_over_limit() {
        let monitor = QuotaMonitor::new(limits(3, 100));

        for _ in 0..3 {
            monitor.record_request();
        }

        assert!(!monitor.can_make_request());
        let stats = monitor.stats();
        assert_eq!(stats.recent_requests, 3);
        assert_eq!(stats.remaining_quota, 0);
        assert!(stats.quota_reset_in <= 60);
    }

    #[test]
    fn hourly_window_independent_of_minute() {
        // Hour limit lower than the minute limit: exhausting it must deny
        // even though the minute window still has capacity.
        let monitor = QuotaMonitor::new(limits(10, 3));

        for _ in 0..3 {
            monitor.record_request();
        }

        let stats = monitor.stats();
        assert_eq!(stats.recent_requests, 3);
        assert_eq!(stats.hourly_requests, 3);
        assert!(!monitor.can_make_request());
    }

    #[test]
    fn requests_age_out_of_window() {
        let monitor = QuotaMonitor::with_windows(
            limits(2, 100),
            Duration::from_millis(50),
            Duration::from_secs(3600),
        );

        monitor.record_request();
        monitor.record_request();
        assert!(!monitor.can_make_request());

        std::thread::sleep(Duration::from_millis(80));
        assert!(monitor.can_make_request());
        assert_eq!(monitor.stats().recent_requests, 0);
    }

    #[test]
    fn remaining_quota_is_min_of_both_windows() {
        let monitor = QuotaMonitor::new(limits(8, 4));

        monitor.record_request();
        monitor.record_request();

        let stats = monitor.stats();
        // minute leaves 6, hour leaves 2
        assert_eq!(stats.remaining_quota, 2);
    }

    #[test]
    fn stats_on_fresh_monitor() {
        let monitor = QuotaMonitor::new(limits(8, 15));
        let stats = monitor.stats();

        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.recent_requests, 0);
        assert_eq!(stats.remaining_quota, 8);
        assert_eq!(stats.quota_reset_in, 0);
        assert_eq!(stats.hourly_reset_in, 0);
    }

    #[test]
    fn total_counter_is_monotonic() {
        let monitor = QuotaMonitor::with_windows(
            limits(100, 100),
            Duration::from_millis(10),
            Duration::from_millis(10),
        );

        for _ in 0..5 {
            monitor.record_request();
        }
        std::thread::sleep(Duration::from_millis(30));

        let stats = monitor.stats();
        assert_eq!(stats.recent_requests, 0);
        assert_eq!(stats.total_requests, 5);
    }
}
