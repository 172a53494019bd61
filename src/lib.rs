//! # LogiCore Reports
//!
//! AI-generated inventory analytics reports for the LogiCore platform.
//!
//! The service aggregates inventory, order, and supplier data from the
//! relational store, derives a deterministic analysis, asks a generative-AI
//! provider for a natural-language report, and persists the result as a
//! JSON document. Local quota windows and a primary/fallback credential
//! pair keep provider usage inside free-tier limits.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logicore_reports::{Config, ReportKind, ReportPeriod, ReportService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let service = ReportService::new(config).await?;
//!
//!     let period = ReportPeriod {
//!         start: chrono::Utc::now().date_naive() - chrono::Duration::days(7),
//!         end: chrono::Utc::now().date_naive(),
//!     };
//!     let report = service.generate_report(ReportKind::Weekly, period, None).await?;
//!     println!("{}", report.content);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{ReportError, Result};

pub use crate::core::aggregator::{analyze, Analysis, ReportAggregator, StockStatus};
pub use crate::core::ai::{AiClientStatus, AiClientWrapper};
pub use crate::core::quota::{QuotaMonitor, QuotaStats};
pub use crate::core::report::{
    ReportDocument, ReportGenerator, ReportKind, ReportPeriod, ReportSummary, ScheduledReports,
};
pub use storage::ReportStore;

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// The assembled report service
///
/// Wires the quota monitor, AI client, aggregator, and store together
/// from one [`Config`] and exposes the operations the CLI and any host
/// application need.
pub struct ReportService {
    quota: Arc<QuotaMonitor>,
    ai: Arc<AiClientWrapper>,
    store: Arc<ReportStore>,
    generator: ReportGenerator,
}

impl ReportService {
    /// Build the service, connecting to the database and opening the store
    pub async fn new(config: Config) -> Result<Self> {
        info!("assembling report service");

        let db = storage::connect(&config.database).await?;
        let quota = Arc::new(QuotaMonitor::new(config.quota.clone()));
        let ai = Arc::new(
            AiClientWrapper::from_config(&config.ai)
                .map_err(|e| ReportError::Config(format!("AI client: {}", e)))?,
        );
        let aggregator = Arc::new(ReportAggregator::new(db, &config.cache));
        let store = Arc::new(ReportStore::new(&config.storage).await?);

        let generator = ReportGenerator::new(
            quota.clone(),
            ai.clone(),
            aggregator,
            store.clone(),
            &config.ai,
        );

        Ok(Self {
            quota,
            ai,
            store,
            generator,
        })
    }

    /// Generate and persist one report
    pub async fn generate_report(
        &self,
        kind: ReportKind,
        period: ReportPeriod,
        user_id: Option<Uuid>,
    ) -> Result<ReportDocument> {
        self.generator.generate_report(kind, period, user_id).await
    }

    /// Generate the weekly and monthly reports as one batch
    pub async fn generate_scheduled_reports(
        &self,
        user_id: Option<Uuid>,
    ) -> Result<ScheduledReports> {
        self.generator.generate_scheduled_reports(user_id).await
    }

    /// List stored reports, newest first
    pub async fn list_reports(&self) -> Result<Vec<ReportSummary>> {
        self.store.list().await
    }

    /// Load one stored report by id
    pub async fn get_report(&self, id: &str) -> Result<ReportDocument> {
        self.store.load(id).await
    }

    /// Snapshot of the local quota windows
    pub fn quota_stats(&self) -> QuotaStats {
        self.quota.stats()
    }

    /// Snapshot of the AI failover state
    pub fn ai_status(&self) -> AiClientStatus {
        self.ai.status()
    }

    /// Return the AI client to the primary credential
    pub fn reset_to_primary(&self) {
        self.ai.reset_to_primary()
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_info_is_populated() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "logicore-reports");
    }
}
