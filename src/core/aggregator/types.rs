//! Row and result-set types for the aggregation battery
//!
//! Monetary columns are decoded as `rust_decimal::Decimal` so report
//! totals stay exact; never floats.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-product stock classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    Overstock,
    Normal,
}

impl StockStatus {
    /// Classification rule, mirrored by the SQL CASE in the inventory query
    pub fn classify(stock_quantity: i32, reorder_level: i32) -> Self {
        if stock_quantity == 0 {
            Self::OutOfStock
        } else if stock_quantity <= reorder_level {
            Self::LowStock
        } else if stock_quantity > reorder_level * 3 {
            Self::Overstock
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfStock => "OUT_OF_STOCK",
            Self::LowStock => "LOW_STOCK",
            Self::Overstock => "OVERSTOCK",
            Self::Normal => "NORMAL",
        }
    }
}

impl std::str::FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OUT_OF_STOCK" => Ok(Self::OutOfStock),
            "LOW_STOCK" => Ok(Self::LowStock),
            "OVERSTOCK" => Ok(Self::Overstock),
            "NORMAL" => Ok(Self::Normal),
            other => Err(format!("unknown stock status: {}", other)),
        }
    }
}

/// One product in the current inventory snapshot
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct InventoryRow {
    pub id: i64,
    pub name: String,
    pub stock_quantity: i32,
    pub reorder_level: i32,
    pub unit_price: Decimal,
    /// SQL-computed classification, same rule as [`StockStatus::classify`]
    pub stock_status: String,
}

/// Aggregate counts and sums for the scope
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct SummaryRow {
    pub total_products: i64,
    pub total_suppliers: i64,
    pub total_orders: i64,
    pub inventory_value: Decimal,
}

/// One order within the report period
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: i64,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub total_amount: Decimal,
    pub item_count: i64,
}

/// Top-selling product by quantity in the period
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct TopProductRow {
    pub product_id: i64,
    pub name: String,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
}

/// Supplier portfolio performance
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct SupplierRow {
    pub supplier_id: i64,
    pub name: String,
    pub product_count: i64,
    pub portfolio_value: Decimal,
}

/// Outstanding reorder alert
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct AlertRow {
    pub product_id: i64,
    pub name: String,
    pub stock_quantity: i32,
    pub reorder_level: i32,
    /// Units needed to restock to twice the reorder level
    pub units_needed: i32,
    pub unit_price: Decimal,
}

/// Combined result of one aggregation run, immutable once produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResultSet {
    pub inventory: Vec<InventoryRow>,
    pub summary: SummaryRow,
    pub orders: Vec<OrderRow>,
    pub top_products: Vec<TopProductRow>,
    pub suppliers: Vec<SupplierRow>,
    pub alerts: Vec<AlertRow>,
}

/// Cache key for one aggregation scope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// `None` is the admin all-users scope
    pub user_id: Option<Uuid>,
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let user = self
            .user_id
            .map(|u| u.to_string())
            .unwrap_or_else(|| "all".to_string());
        write!(f, "{}_{}_{}", self.start, self.end, user)
    }
}
