//! Report data aggregation: SQL battery, TTL cache, and analysis pass

pub mod analysis;
mod cache;
pub mod queries;
pub mod types;

#[cfg(test)]
mod tests;

pub use analysis::{analyze, Analysis, StockHealth, TurnoverRisk};
pub use queries::ReportAggregator;
pub use types::{AggregateResultSet, CacheKey, StockStatus};
