//! Report generation orchestration
//!
//! Drives one report end to end: local quota gate, call throttle, data
//! aggregation, analysis, prompt construction, the AI call under a
//! deadline, and persistence. Provider errors are translated into the
//! crate taxonomy here so callers see actionable variants only.

use super::prompt::build_prompt;
use super::types::{
    AiStatus, DataSnapshot, ReportDocument, ReportKind, ReportPeriod,
};
use crate::config::AiConfig;
use crate::core::aggregator::analysis::analyze;
use crate::core::aggregator::ReportAggregator;
use crate::core::ai::{AiClientWrapper, ProviderError};
use crate::core::quota::QuotaMonitor;
use crate::storage::ReportStore;
use crate::utils::error::{ReportError, Result};
use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

const WEEKLY_DAYS: i64 = 7;
const MONTHLY_DAYS: i64 = 30;

/// Timing knobs for the generator, taken from the AI config
#[derive(Debug, Clone)]
pub struct GeneratorTiming {
    /// Minimum spacing between AI calls, across all report kinds
    pub min_call_interval: Duration,
    /// Overall deadline for one AI call
    pub call_timeout: Duration,
    /// Pause between the two reports of a scheduled batch
    pub scheduled_delay: Duration,
}

impl From<&AiConfig> for GeneratorTiming {
    fn from(config: &AiConfig) -> Self {
        Self {
            min_call_interval: Duration::from_secs(config.min_call_interval_secs),
            call_timeout: Duration::from_secs(config.call_timeout_secs),
            scheduled_delay: Duration::from_secs(config.scheduled_delay_secs),
        }
    }
}

/// Outcome of a scheduled batch; each report succeeds or fails on its own
#[derive(Debug)]
pub struct ScheduledReports {
    pub weekly: Result<ReportDocument>,
    pub monthly: Result<ReportDocument>,
}

/// Orchestrates quota, aggregation, AI generation, and storage
pub struct ReportGenerator {
    quota: Arc<QuotaMonitor>,
    ai: Arc<AiClientWrapper>,
    aggregator: Arc<ReportAggregator>,
    store: Arc<ReportStore>,
    timing: GeneratorTiming,
    last_api_call: Mutex<Option<Instant>>,
}

impl ReportGenerator {
    pub fn new(
        quota: Arc<QuotaMonitor>,
        ai: Arc<AiClientWrapper>,
        aggregator: Arc<ReportAggregator>,
        store: Arc<ReportStore>,
        ai_config: &AiConfig,
    ) -> Self {
        Self {
            quota,
            ai,
            aggregator,
            store,
            timing: GeneratorTiming::from(ai_config),
            last_api_call: Mutex::new(None),
        }
    }

    /// Generate, persist, and return one report
    ///
    /// The quota slot is consumed only once aggregation has succeeded and
    /// the AI call is about to be issued; a database failure never burns
    /// quota.
    pub async fn generate_report(
        &self,
        kind: ReportKind,
        period: ReportPeriod,
        user_id: Option<Uuid>,
    ) -> Result<ReportDocument> {
        if !self.quota.can_make_request() {
            let stats = self.quota.stats();
            return Err(ReportError::RateLimited {
                remaining: stats.remaining_quota,
                // Both windows may be binding; report the later reset
                reset_in: stats.quota_reset_in.max(stats.hourly_reset_in),
            });
        }

        self.throttle().await;

        let data = self
            .aggregator
            .report_data(period.start, period.end, user_id)
            .await?;
        let analysis = analyze(&data);
        let prompt = build_prompt(kind, period.start, period.end, &analysis);

        self.quota.record_request();
        *self.last_api_call.lock() = Some(Instant::now());

        let generation =
            match tokio::time::timeout(self.timing.call_timeout, self.ai.generate_content(&prompt))
                .await
            {
                Err(_) => return Err(ReportError::Timeout(self.timing.call_timeout.as_secs())),
                Ok(Err(err)) => return Err(self.translate(err)),
                Ok(Ok(generation)) => generation,
            };

        let generated_at = Utc::now();
        let report = ReportDocument {
            id: ReportDocument::make_id(kind, generated_at),
            kind,
            period,
            generated_at,
            user_id,
            ai_status: if generation.used_fallback {
                AiStatus::Fallback
            } else {
                AiStatus::Primary
            },
            data_snapshot: DataSnapshot {
                total_products: data.summary.total_products,
                total_suppliers: data.summary.total_suppliers,
                total_orders: data.summary.total_orders,
                inventory_value: data.summary.inventory_value,
            },
            content: generation.text,
            raw_data: (*data).clone(),
            analysis,
        };

        self.store.save(&report).await?;
        info!(id = %report.id, kind = %kind, "report generated");
        Ok(report)
    }

    /// Generate the weekly and monthly reports as one batch
    ///
    /// Refuses to start unless two quota slots are free, so the batch
    /// never half-completes for quota reasons. A failure of the first
    /// report does not stop the second.
    pub async fn generate_scheduled_reports(
        &self,
        user_id: Option<Uuid>,
    ) -> Result<ScheduledReports> {
        let stats = self.quota.stats();
        if stats.remaining_quota < 2 {
            return Err(ReportError::RateLimited {
                remaining: stats.remaining_quota,
                reset_in: stats.quota_reset_in.max(stats.hourly_reset_in),
            });
        }

        let today = Utc::now().date_naive();
        let weekly_period = ReportPeriod {
            start: today - ChronoDuration::days(WEEKLY_DAYS),
            end: today,
        };
        let monthly_period = ReportPeriod {
            start: today - ChronoDuration::days(MONTHLY_DAYS),
            end: today,
        };

        let weekly = self
            .generate_report(ReportKind::Weekly, weekly_period, user_id)
            .await;
        if let Err(err) = &weekly {
            warn!(error = %err, "weekly report failed, continuing with monthly");
        }

        tokio::time::sleep(self.timing.scheduled_delay).await;

        let monthly = self
            .generate_report(ReportKind::Monthly, monthly_period, user_id)
            .await;
        if let Err(err) = &monthly {
            warn!(error = %err, "monthly report failed");
        }

        Ok(ScheduledReports { weekly, monthly })
    }

    /// Enforce the minimum spacing between AI calls
    ///
    /// The lock is released before sleeping so concurrent callers are not
    /// serialized on the mutex for the wait itself.
    async fn throttle(&self) {
        let wait = {
            let last = self.last_api_call.lock();
            last.and_then(|at| self.timing.min_call_interval.checked_sub(at.elapsed()))
        };

        if let Some(wait) = wait {
            if !wait.is_zero() {
                info!(wait_ms = wait.as_millis() as u64, "throttling AI call");
                tokio::time::sleep(wait).await;
            }
        }
    }

    /// Map a classified provider failure into the crate taxonomy
    fn translate(&self, err: ProviderError) -> ReportError {
        match err {
            ProviderError::QuotaExceeded { message, .. } => {
                ReportError::ProviderQuotaExceeded(message)
            }
            ProviderError::RateLimit {
                message,
                retry_after,
                ..
            } => ReportError::ProviderRateLimited {
                message,
                retry_after,
            },
            ProviderError::ModelNotFound { model, .. } => ReportError::ModelUnavailable(model),
            ProviderError::NoCredentials { .. } => ReportError::NoClientAvailable,
            ProviderError::Timeout { .. } => {
                ReportError::Timeout(self.timing.call_timeout.as_secs())
            }
            other => ReportError::Generation {
                message: other.to_string(),
                status: self.ai.status().to_string(),
            },
        }
    }
}
