//! File-based report store
//!
//! One pretty-printed JSON document per report under a configured
//! directory. Reports are immutable once written; there is no update or
//! delete path. Listing reads every file, which is fine at the volumes a
//! quota-limited generator can produce.

use crate::config::StorageConfig;
use crate::core::report::types::{ReportDocument, ReportSummary};
use crate::utils::error::{ReportError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Local-filesystem store for generated reports
#[derive(Debug, Clone)]
pub struct ReportStore {
    reports_dir: PathBuf,
}

impl ReportStore {
    /// Open the store, creating the directory if needed
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.reports_dir)
            .await
            .map_err(|e| {
                ReportError::Storage(format!(
                    "failed to create reports directory {:?}: {}",
                    config.reports_dir, e
                ))
            })?;

        info!(dir = ?config.reports_dir, "report store ready");
        Ok(Self {
            reports_dir: config.reports_dir.clone(),
        })
    }

    /// Persist one report, returning the path it was written to
    pub async fn save(&self, report: &ReportDocument) -> Result<PathBuf> {
        let path = self.path_for(&report.id);
        let json = serde_json::to_vec_pretty(report)?;
        tokio::fs::write(&path, json).await?;

        debug!(id = %report.id, path = ?path, "report saved");
        Ok(path)
    }

    /// Load one report by id
    pub async fn load(&self, id: &str) -> Result<ReportDocument> {
        let path = self.path_for(id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ReportError::NotFound(format!("report {}", id)));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// List all stored reports, newest first
    ///
    /// Files that fail to parse are logged and skipped so one corrupt
    /// document cannot break the listing.
    pub async fn list(&self) -> Result<Vec<ReportSummary>> {
        let mut entries = tokio::fs::read_dir(&self.reports_dir).await?;
        let mut summaries = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match Self::read_summary(&path).await {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    warn!(path = ?path, error = %e, "skipping unreadable report file");
                }
            }
        }

        summaries.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(summaries)
    }

    async fn read_summary(path: &Path) -> Result<ReportSummary> {
        let bytes = tokio::fs::read(path).await?;
        let report: ReportDocument = serde_json::from_slice(&bytes)?;
        Ok(report.summary())
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.reports_dir.join(format!("{}.json", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::analysis::analyze;
    use crate::core::aggregator::types::{AggregateResultSet, SummaryRow};
    use crate::core::report::types::{AiStatus, DataSnapshot, ReportKind, ReportPeriod};
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn sample_report(id: &str) -> ReportDocument {
        let raw_data = AggregateResultSet {
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
        };
        let analysis = analyze(&raw_data);

        ReportDocument {
            id: id.to_string(),
            kind: ReportKind::Weekly,
            period: ReportPeriod {
                start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            },
            generated_at: Utc::now(),
            user_id: None,
            ai_status: AiStatus::Primary,
            data_snapshot: DataSnapshot {
                total_products: 0,
                total_suppliers: 0,
                total_orders: 0,
                inventory_value: Decimal::ZERO,
            },
            content: "All quiet.".to_string(),
            raw_data,
            analysis,
        }
    }

    async fn store_in(dir: &TempDir) -> ReportStore {
        let config = StorageConfig {
            reports_dir: dir.path().to_path_buf(),
        };
        ReportStore::new(&config).await.unwrap()
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let report = sample_report("weekly-20250301T120000-aaaa1111");

        let path = store.save(&report).await.unwrap();
        assert!(path.ends_with("weekly-20250301T120000-aaaa1111.json"));

        let loaded = store.load(&report.id).await.unwrap();
        assert_eq!(loaded, report);
    }

    #[tokio::test]
    async fn missing_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let err = store.load("weekly-nope").await.unwrap_err();
        assert!(matches!(err, ReportError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_sorts_newest_first_and_skips_garbage() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let mut older = sample_report("weekly-older");
        older.generated_at = Utc::now() - chrono::Duration::hours(2);
        let newer = sample_report("weekly-newer");
        store.save(&older).await.unwrap();
        store.save(&newer).await.unwrap();

        // Corrupt file and a non-json file must both be ignored
        tokio::fs::write(dir.path().join("broken.json"), b"not json")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("notes.txt"), b"ignore me")
            .await
            .unwrap();

        let listing = store.list().await.unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].id, "weekly-newer");
        assert_eq!(listing[1].id, "weekly-older");
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        assert!(store.list().await.unwrap().is_empty());
    }
}
