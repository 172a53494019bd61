//! Analysis pass over an aggregate result set
//!
//! Deterministic and side-effect-free: recomputed for every report, never
//! cached. All money math stays in `Decimal`.

use super::types::{AggregateResultSet, StockStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const TOP_PRODUCTS: usize = 5;
const TOP_ALERTS: usize = 5;
const TOP_SUPPLIERS: usize = 5;

/// Derived view over one aggregation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub stock_health: StockHealth,
    pub top_products_by_value: Vec<ProductValue>,
    pub restock_alerts: Vec<RestockAlert>,
    pub top_suppliers: Vec<SupplierShare>,
    pub order_summary: OrderSummary,
    pub financial: FinancialProjection,
    pub turnover_risk: TurnoverRisk,
}

/// Stock-status breakdown with integer percentages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockHealth {
    pub total_products: usize,
    pub out_of_stock: usize,
    pub low_stock: usize,
    pub overstock: usize,
    pub normal: usize,
    pub out_of_stock_pct: u32,
    pub low_stock_pct: u32,
    pub overstock_pct: u32,
    pub normal_pct: u32,
}

/// Product ranked by total inventory value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductValue {
    pub name: String,
    pub total_value: Decimal,
}

/// Reorder alert with the investment needed to clear it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestockAlert {
    pub name: String,
    pub units_needed: i32,
    pub investment: Decimal,
}

/// Supplier ranked by portfolio value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierShare {
    pub name: String,
    pub product_count: i64,
    pub portfolio_value: Decimal,
}

/// Orders within the report period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_count: usize,
    pub total_amount: Decimal,
}

/// Capital positions derived from the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProjection {
    /// Total inventory value in scope
    pub inventory_value: Decimal,
    /// Capital tied up in overstocked products
    pub overstock_capital: Decimal,
    /// Investment required to clear all reorder alerts
    pub restock_investment: Decimal,
}

/// Coarse turnover-risk label from the overstock share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnoverRisk {
    High,
    Medium,
    Low,
}

impl TurnoverRisk {
    /// High above 50% overstock, Medium above 25%, Low otherwise
    pub fn from_overstock_pct(pct: u32) -> Self {
        if pct > 50 {
            Self::High
        } else if pct > 25 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Nearest-integer percentage, round half up
fn pct(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * count + total) / (2 * total)) as u32
}

/// Compute the derived analysis for one aggregate result set
pub fn analyze(data: &AggregateResultSet) -> Analysis {
    let mut out_of_stock = 0;
    let mut low_stock = 0;
    let mut overstock = 0;
    let mut normal = 0;
    let mut overstock_capital = Decimal::ZERO;

    for row in &data.inventory {
        match StockStatus::classify(row.stock_quantity, row.reorder_level) {
            StockStatus::OutOfStock => out_of_stock += 1,
            StockStatus::LowStock => low_stock += 1,
            StockStatus::Overstock => {
                overstock += 1;
                overstock_capital += Decimal::from(row.stock_quantity) * row.unit_price;
            }
            StockStatus::Normal => normal += 1,
        }
    }

    let total_products = data.inventory.len();
    let overstock_pct = pct(overstock, total_products);
    let stock_health = StockHealth {
        total_products,
        out_of_stock,
        low_stock,
        overstock,
        normal,
        out_of_stock_pct: pct(out_of_stock, total_products),
        low_stock_pct: pct(low_stock, total_products),
        overstock_pct,
        normal_pct: pct(normal, total_products),
    };

    let mut by_value: Vec<ProductValue> = data
        .inventory
        .iter()
        .map(|row| ProductValue {
            name: row.name.clone(),
            total_value: Decimal::from(row.stock_quantity) * row.unit_price,
        })
        .collect();
    by_value.sort_by(|a, b| b.total_value.cmp(&a.total_value));
    by_value.truncate(TOP_PRODUCTS);

    let mut restock_alerts: Vec<RestockAlert> = data
        .alerts
        .iter()
        .map(|alert| RestockAlert {
            name: alert.name.clone(),
            units_needed: alert.units_needed,
            investment: Decimal::from(alert.units_needed) * alert.unit_price,
        })
        .collect();
    restock_alerts.sort_by(|a, b| b.units_needed.cmp(&a.units_needed));
    let restock_investment: Decimal = restock_alerts.iter().map(|a| a.investment).sum();
    restock_alerts.truncate(TOP_ALERTS);

    let mut top_suppliers: Vec<SupplierShare> = data
        .suppliers
        .iter()
        .map(|s| SupplierShare {
            name: s.name.clone(),
            product_count: s.product_count,
            portfolio_value: s.portfolio_value,
        })
        .collect();
    top_suppliers.sort_by(|a, b| b.portfolio_value.cmp(&a.portfolio_value));
    top_suppliers.truncate(TOP_SUPPLIERS);

    let order_summary = OrderSummary {
        order_count: data.orders.len(),
        total_amount: data.orders.iter().map(|o| o.total_amount).sum(),
    };

    Analysis {
        stock_health,
        top_products_by_value: by_value,
        restock_alerts,
        top_suppliers,
        order_summary,
        financial: FinancialProjection {
            inventory_value: data.summary.inventory_value,
            overstock_capital,
            restock_investment,
        },
        turnover_risk: TurnoverRisk::from_overstock_pct(overstock_pct),
    }
}
