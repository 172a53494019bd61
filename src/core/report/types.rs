//! Report document types

use crate::core::aggregator::analysis::Analysis;
use crate::core::aggregator::types::AggregateResultSet;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Report cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Weekly,
    Monthly,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!("unknown report kind: {}", other)),
        }
    }
}

/// Date range the report covers, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Which credential produced the report content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiStatus {
    Primary,
    Fallback,
}

/// Headline numbers captured at generation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSnapshot {
    pub total_products: i64,
    pub total_suppliers: i64,
    pub total_orders: i64,
    pub inventory_value: Decimal,
}

/// A generated report, immutable once written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Store id; embeds the generation timestamp
    pub id: String,
    pub kind: ReportKind,
    pub period: ReportPeriod,
    pub generated_at: DateTime<Utc>,
    /// Scope the report was generated for; `None` is the admin view
    pub user_id: Option<Uuid>,
    pub ai_status: AiStatus,
    pub data_snapshot: DataSnapshot,
    /// The generated natural-language report
    pub content: String,
    /// The aggregate rows the analysis was derived from
    pub raw_data: AggregateResultSet,
    pub analysis: Analysis,
}

impl ReportDocument {
    /// Build an id like `weekly-20250301T120000-3fa4b1c2`
    pub fn make_id(kind: ReportKind, generated_at: DateTime<Utc>) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!(
            "{}-{}-{}",
            kind.as_str(),
            generated_at.format("%Y%m%dT%H%M%S"),
            &suffix[..8]
        )
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            id: self.id.clone(),
            kind: self.kind,
            period: self.period,
            generated_at: self.generated_at,
            user_id: self.user_id,
            ai_status: self.ai_status,
        }
    }
}

/// Listing entry: metadata without content or raw rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: String,
    pub kind: ReportKind,
    pub period: ReportPeriod,
    pub generated_at: DateTime<Utc>,
    pub user_id: Option<Uuid>,
    pub ai_status: AiStatus,
}
