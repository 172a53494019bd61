//! Report data aggregation with a TTL cache in front
//!
//! Runs a fixed battery of SQL aggregation queries for a date range and an
//! optional user scope. Admin views pass `None` to see all data; the
//! caller owns that scoping decision. Any query failure propagates as-is:
//! the whole aggregation is all-or-nothing per call.

use super::cache::AggregateCache;
use super::types::{
    AggregateResultSet, AlertRow, CacheKey, InventoryRow, OrderRow, SummaryRow, SupplierRow,
    TopProductRow,
};
use crate::config::CacheConfig;
use crate::utils::error::Result;
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

// Every query binds the user scope as $1; a NULL uuid disables the filter
// so parameter positions stay fixed.

const INVENTORY_SQL: &str = "\
SELECT p.id, p.name, p.stock_quantity, p.reorder_level, p.unit_price, \
CASE WHEN p.stock_quantity = 0 THEN 'OUT_OF_STOCK' \
WHEN p.stock_quantity <= p.reorder_level THEN 'LOW_STOCK' \
WHEN p.stock_quantity > p.reorder_level * 3 THEN 'OVERSTOCK' \
ELSE 'NORMAL' END AS stock_status \
FROM products p \
WHERE ($1::uuid IS NULL OR p.user_id = $1) \
ORDER BY p.name";

const SUMMARY_SQL: &str = "\
SELECT \
(SELECT COUNT(*) FROM products WHERE ($1::uuid IS NULL OR user_id = $1)) AS total_products, \
(SELECT COUNT(*) FROM suppliers WHERE ($1::uuid IS NULL OR user_id = $1)) AS total_suppliers, \
(SELECT COUNT(*) FROM orders WHERE order_date::date BETWEEN $2 AND $3 \
 AND ($1::uuid IS NULL OR user_id = $1)) AS total_orders, \
(SELECT COALESCE(SUM(stock_quantity * unit_price), 0) FROM products \
 WHERE ($1::uuid IS NULL OR user_id = $1)) AS inventory_value";

const ORDERS_SQL: &str = "\
SELECT o.id, o.order_date, o.status, o.total_amount, \
(SELECT COUNT(*) FROM order_items oi WHERE oi.order_id = o.id) AS item_count \
FROM orders o \
WHERE o.order_date::date BETWEEN $2 AND $3 AND ($1::uuid IS NULL OR o.user_id = $1) \
ORDER BY o.order_date DESC";

const TOP_PRODUCTS_SQL: &str = "\
SELECT p.id AS product_id, p.name, SUM(oi.quantity)::bigint AS total_quantity, \
COALESCE(SUM(oi.quantity * oi.unit_price), 0) AS total_revenue \
FROM order_items oi \
JOIN orders o ON o.id = oi.order_id \
JOIN products p ON p.id = oi.product_id \
WHERE o.order_date::date BETWEEN $2 AND $3 AND ($1::uuid IS NULL OR o.user_id = $1) \
GROUP BY p.id, p.name \
ORDER BY total_quantity DESC \
LIMIT 10";

const SUPPLIERS_SQL: &str = "\
SELECT s.id AS supplier_id, s.name, COUNT(p.id)::bigint AS product_count, \
COALESCE(SUM(p.stock_quantity * p.unit_price), 0) AS portfolio_value \
FROM suppliers s \
LEFT JOIN products p ON p.supplier_id = s.id \
WHERE ($1::uuid IS NULL OR s.user_id = $1) \
GROUP BY s.id, s.name \
ORDER BY portfolio_value DESC";

const ALERTS_SQL: &str = "\
SELECT p.id AS product_id, p.name, p.stock_quantity, p.reorder_level, \
(p.reorder_level * 2 - p.stock_quantity) AS units_needed, p.unit_price \
FROM products p \
WHERE p.stock_quantity <= p.reorder_level AND ($1::uuid IS NULL OR p.user_id = $1) \
ORDER BY units_needed DESC";

/// Aggregation battery with a per-scope TTL cache
#[derive(Debug)]
pub struct ReportAggregator {
    db: DatabaseConnection,
    cache: AggregateCache,
}

impl ReportAggregator {
    pub fn new(db: DatabaseConnection, cache_config: &CacheConfig) -> Self {
        Self {
            db,
            cache: AggregateCache::new(Duration::from_secs(cache_config.ttl_secs)),
        }
    }

    /// Fetch the combined aggregate data for one scope
    ///
    /// A non-expired cache entry for the same `(start, end, user)` triple
    /// is returned verbatim without touching the database.
    pub async fn report_data(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        user_id: Option<Uuid>,
    ) -> Result<Arc<AggregateResultSet>> {
        let key = CacheKey {
            start,
            end,
            user_id,
        };
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        debug!(key = %key, "aggregation cache miss, running query battery");

        let user_param: Value = user_id.into();
        let scope_only = vec![user_param.clone()];
        let dated = vec![user_param, start.into(), end.into()];

        let inventory = InventoryRow::find_by_statement(self.stmt(INVENTORY_SQL, scope_only.clone()))
            .all(&self.db)
            .await?;
        let summary = SummaryRow::find_by_statement(self.stmt(SUMMARY_SQL, dated.clone()))
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::Custom("summary query returned no rows".to_string()))?;
        let orders = OrderRow::find_by_statement(self.stmt(ORDERS_SQL, dated.clone()))
            .all(&self.db)
            .await?;
        let top_products = TopProductRow::find_by_statement(self.stmt(TOP_PRODUCTS_SQL, dated))
            .all(&self.db)
            .await?;
        let suppliers = SupplierRow::find_by_statement(self.stmt(SUPPLIERS_SQL, scope_only.clone()))
            .all(&self.db)
            .await?;
        let alerts = AlertRow::find_by_statement(self.stmt(ALERTS_SQL, scope_only))
            .all(&self.db)
            .await?;

        let data = Arc::new(AggregateResultSet {
            inventory,
            summary,
            orders,
            top_products,
            suppliers,
            alerts,
        });

        self.cache.insert(key, data.clone());
        self.cache.sweep();

        Ok(data)
    }

    fn stmt(&self, sql: &str, values: Vec<Value>) -> Statement {
        Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
    }
}
