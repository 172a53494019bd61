//! Cache behavior tests for the aggregator, backed by a mock database
//!
//! The mock yields each appended result exactly once, so a second call
//! succeeding without more appended results proves it never re-queried.

#[cfg(test)]
mod tests {
    use crate::config::CacheConfig;
    use crate::core::aggregator::queries::ReportAggregator;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;
    use std::time::Duration;

    type MockRow = BTreeMap<&'static str, Value>;

    fn inventory_row() -> MockRow {
        BTreeMap::from([
            ("id", 1i64.into()),
            ("name", "Widget".into()),
            ("stock_quantity", 0i32.into()),
            ("reorder_level", 5i32.into()),
            ("unit_price", Decimal::new(250, 2).into()),
            ("stock_status", "OUT_OF_STOCK".into()),
        ])
    }

    fn summary_row() -> MockRow {
        BTreeMap::from([
            ("total_products", 1i64.into()),
            ("total_suppliers", 1i64.into()),
            ("total_orders", 0i64.into()),
            ("inventory_value", Decimal::ZERO.into()),
        ])
    }

    /// One full battery's worth of results, in execution order
    fn battery() -> Vec<Vec<MockRow>> {
        vec![
            vec![inventory_row()], // inventory
            vec![summary_row()],   // summary
            vec![],                // orders
            vec![],                // top products
            vec![],                // suppliers
            vec![],                // alerts
        ]
    }

    fn dates() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
        )
    }

    #[tokio::test]
    async fn second_call_within_ttl_is_served_from_cache() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(battery())
            .into_connection();
        let aggregator = ReportAggregator::new(db, &CacheConfig { ttl_secs: 300 });
        let (start, end) = dates();

        let first = aggregator.report_data(start, end, None).await.unwrap();
        // The mock has no results left; only a cache hit can satisfy this.
        let second = aggregator.report_data(start, end, None).await.unwrap();

        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(first.inventory.len(), 1);
        assert_eq!(first.summary.total_products, 1);
    }

    #[tokio::test]
    async fn expired_entry_triggers_requery() {
        let mut results = battery();
        results.extend(battery());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(results)
            .into_connection();
        let aggregator = ReportAggregator::new(db, &CacheConfig { ttl_secs: 1 });
        let (start, end) = dates();

        let first = aggregator.report_data(start, end, None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        let second = aggregator.report_data(start, end, None).await.unwrap();

        // Fresh fetch: equal data, distinct allocation
        assert!(!std::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[tokio::test]
    async fn different_user_scope_is_a_distinct_key() {
        let mut results = battery();
        results.extend(battery());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(results)
            .into_connection();
        let aggregator = ReportAggregator::new(db, &CacheConfig { ttl_secs: 300 });
        let (start, end) = dates();

        aggregator.report_data(start, end, None).await.unwrap();
        // Scoped call must run its own battery, consuming the second batch.
        let scoped = aggregator
            .report_data(start, end, Some(uuid::Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(scoped.inventory.len(), 1);
    }

    #[tokio::test]
    async fn query_failure_propagates_without_caching() {
        // No results appended at all: the first query errors out.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let aggregator = ReportAggregator::new(db, &CacheConfig { ttl_secs: 300 });
        let (start, end) = dates();

        let err = aggregator.report_data(start, end, None).await.unwrap_err();
        assert!(matches!(
            err,
            crate::utils::error::ReportError::Aggregation(_)
        ));
    }
}
