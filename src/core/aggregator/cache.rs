//! TTL cache over aggregation results
//!
//! One entry per `(start, end, user)` scope. Entries expire by age; the
//! aggregator sweeps opportunistically after each miss. Concurrent misses
//! for the same key are not deduplicated: each computes independently and
//! the last store wins.

use super::types::{AggregateResultSet, CacheKey};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedResult {
    data: Arc<AggregateResultSet>,
    stored_at: Instant,
}

/// In-process TTL map keyed by aggregation scope
#[derive(Debug)]
pub(crate) struct AggregateCache {
    ttl: Duration,
    entries: DashMap<CacheKey, CachedResult>,
}

impl AggregateCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    /// Return a non-expired entry verbatim, dropping it when stale
    pub(crate) fn get(&self, key: &CacheKey) -> Option<Arc<AggregateResultSet>> {
        let hit = self.entries.get(key).and_then(|entry| {
            if entry.stored_at.elapsed() < self.ttl {
                Some(entry.data.clone())
            } else {
                None
            }
        });

        if hit.is_none() {
            self.entries.remove_if(key, |_, v| v.stored_at.elapsed() >= self.ttl);
        } else {
            debug!(key = %key, "aggregation cache hit");
        }
        hit
    }

    pub(crate) fn insert(&self, key: CacheKey, data: Arc<AggregateResultSet>) {
        self.entries.insert(
            key,
            CachedResult {
                data,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every expired entry
    pub(crate) fn sweep(&self) {
        let before = self.entries.len();
        self.entries.retain(|_, v| v.stored_at.elapsed() < self.ttl);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, "swept expired aggregation cache entries");
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::types::SummaryRow;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn key(day: u32) -> CacheKey {
        CacheKey {
            start: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, day + 7).unwrap(),
            user_id: None,
        }
    }

    fn result_set() -> Arc<AggregateResultSet> {
        Arc::new(AggregateResultSet {
            inventory: vec![],
            summary: SummaryRow {
                total_products: 0,
                total_suppliers: 0,
                total_orders: 0,
                inventory_value: Decimal::ZERO,
            },
            orders: vec![],
            top_products: vec![],
            suppliers: vec![],
            alerts: vec![],
        })
    }

    #[test]
    fn hit_within_ttl_returns_same_data() {
        let cache = AggregateCache::new(Duration::from_secs(300));
        let data = result_set();
        cache.insert(key(1), data.clone());

        let hit = cache.get(&key(1)).expect("entry should be cached");
        assert!(Arc::ptr_eq(&hit, &data));
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let cache = AggregateCache::new(Duration::from_millis(20));
        cache.insert(key(1), result_set());

        std::thread::sleep(Duration::from_millis(40));
        assert!(cache.get(&key(1)).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn sweep_removes_only_expired() {
        let cache = AggregateCache::new(Duration::from_millis(50));
        cache.insert(key(1), result_set());
        std::thread::sleep(Duration::from_millis(70));
        cache.insert(key(10), result_set());

        cache.sweep();
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key(10)).is_some());
    }

    #[test]
    fn keys_differ_by_user_scope() {
        let cache = AggregateCache::new(Duration::from_secs(300));
        cache.insert(key(1), result_set());

        let scoped = CacheKey {
            user_id: Some(uuid::Uuid::new_v4()),
            ..key(1)
        };
        assert!(cache.get(&scoped).is_none());
    }
}
