//! Error handling for the report service
//!
//! This module defines the crate-level error taxonomy. Provider-specific
//! failures are classified by the AI client (see [`crate::core::ai`]) and
//! translated into these variants by the report generator, so callers never
//! have to inspect raw provider messages.

use thiserror::Error;

/// Result type alias for the report service
pub type Result<T> = std::result::Result<T, ReportError>;

/// Main error type for the report service
///
/// Every user-visible variant carries an actionable hint in its Display
/// form rather than a bare failure message.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Local quota windows exhausted; retryable after the reported delay
    #[error(
        "report generation rate limited: {remaining} requests remaining, next slot in {reset_in}s - wait and retry"
    )]
    RateLimited {
        /// Requests still available across both windows
        remaining: u32,
        /// Seconds until the oldest in-window request expires
        reset_in: u64,
    },

    /// Remote API plan limit reached; waiting will not help until the plan resets
    #[error("AI provider quota exceeded: {0} - wait for the quota period to reset or review plan/billing")]
    ProviderQuotaExceeded(String),

    /// Remote 429; transient, retryable after the delay
    #[error(
        "AI provider rate limited: {message} - retry in {}s",
        retry_after.unwrap_or(60)
    )]
    ProviderRateLimited {
        /// Provider-reported reason
        message: String,
        /// Provider-suggested retry delay in seconds
        retry_after: Option<u64>,
    },

    /// Remote 404; the configured model does not exist, operator action needed
    #[error("AI model unavailable: {0} - check the configured model name or contact support")]
    ModelUnavailable(String),

    /// Neither AI credential is configured
    #[error(
        "no AI client available - set LOGICORE_AI_API_KEY (and optionally LOGICORE_AI_FALLBACK_KEY) and restart"
    )]
    NoClientAvailable,

    /// AI generation failed after retries; message and client status preserved for diagnostics
    #[error("AI generation failed: {message} (client status: {status})")]
    Generation {
        /// Last provider error message
        message: String,
        /// Snapshot of the failover state at the time of failure
        status: String,
    },

    /// The AI call exceeded the overall deadline
    #[error("AI call timed out after {0}s - retry, the provider may be degraded")]
    Timeout(u64),

    /// Underlying database operation failed; surfaced as-is, no masking
    #[error("database error: {0}")]
    Aggregation(#[from] sea_orm::DbErr),

    /// Report id absent from the store
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Report storage errors
    #[error("report storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    /// Whether the caller can expect a retry to succeed without operator action
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::ProviderRateLimited { .. } | Self::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_message_carries_hint() {
        let err = ReportError::RateLimited {
            remaining: 0,
            reset_in: 42,
        };
        let msg = err.to_string();
        assert!(msg.contains("42s"));
        assert!(msg.contains("wait and retry"));
    }

    #[test]
    fn retryable_classification() {
        assert!(ReportError::Timeout(30).is_retryable());
        assert!(ReportError::ProviderRateLimited {
            message: "slow down".into(),
            retry_after: Some(10),
        }
        .is_retryable());
        assert!(!ReportError::NoClientAvailable.is_retryable());
        assert!(!ReportError::ModelUnavailable("gemini-x".into()).is_retryable());
    }
}
