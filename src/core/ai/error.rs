//! Provider error classification
//!
//! Failures from the generative-AI API are mapped into typed kinds from
//! the HTTP status code and the structured error payload, never from
//! message substrings. The report generator translates these kinds into
//! the crate-level taxonomy.

use thiserror::Error;

/// Typed error for the generative-AI provider client
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("authentication failed for {provider}: {message}")]
    Authentication {
        provider: &'static str,
        message: String,
    },

    #[error("rate limit exceeded for {provider}: {message}")]
    RateLimit {
        provider: &'static str,
        message: String,
        retry_after: Option<u64>,
    },

    #[error("quota exceeded for {provider}: {message}")]
    QuotaExceeded {
        provider: &'static str,
        message: String,
    },

    #[error("model '{model}' not found for {provider}")]
    ModelNotFound {
        provider: &'static str,
        model: String,
    },

    #[error("invalid request for {provider}: {message}")]
    InvalidRequest {
        provider: &'static str,
        message: String,
    },

    #[error("network error for {provider}: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    #[error("timeout for {provider}: {message}")]
    Timeout {
        provider: &'static str,
        message: String,
    },

    #[error("API error for {provider} (status {status}): {message}")]
    ApiError {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("failed to parse {provider} response: {message}")]
    ResponseParsing {
        provider: &'static str,
        message: String,
    },

    #[error("no credentials configured for {provider}")]
    NoCredentials { provider: &'static str },
}

impl ProviderError {
    pub fn authentication(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider,
            message: message.into(),
        }
    }

    pub fn rate_limit(
        provider: &'static str,
        message: impl Into<String>,
        retry_after: Option<u64>,
    ) -> Self {
        Self::RateLimit {
            provider,
            message: message.into(),
            retry_after,
        }
    }

    pub fn quota_exceeded(provider: &'static str, message: impl Into<String>) -> Self {
        Self::QuotaExceeded {
            provider,
            message: message.into(),
        }
    }

    pub fn model_not_found(provider: &'static str, model: impl Into<String>) -> Self {
        Self::ModelNotFound {
            provider,
            model: model.into(),
        }
    }

    pub fn invalid_request(provider: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            provider,
            message: message.into(),
        }
    }

    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Network {
            provider,
            message: message.into(),
        }
    }

    pub fn timeout(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Timeout {
            provider,
            message: message.into(),
        }
    }

    pub fn api_error(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider,
            status,
            message: message.into(),
        }
    }

    pub fn parse(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ResponseParsing {
            provider,
            message: message.into(),
        }
    }

    /// Whether a retry against the same credential can reasonably succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimit { .. } | Self::Network { .. } | Self::Timeout { .. } => true,
            Self::ApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Maps provider HTTP responses onto [`ProviderError`] kinds
pub struct ProviderErrorMapper;

impl ProviderErrorMapper {
    /// Classify a non-success HTTP response
    ///
    /// The body is parsed as the provider's structured error payload
    /// (`{"error": {"code", "message", "status", "details"}}`) when
    /// possible; classification keys off status codes and payload fields,
    /// not message text.
    pub fn from_http_status(provider: &'static str, status: u16, body: &str) -> ProviderError {
        let payload = serde_json::from_str::<serde_json::Value>(body).ok();
        let message = payload
            .as_ref()
            .and_then(|p| p.get("error"))
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or(body)
            .to_string();

        match status {
            401 | 403 => ProviderError::authentication(provider, message),
            404 => ProviderError::model_not_found(provider, message),
            429 => {
                if Self::is_quota_failure(payload.as_ref()) {
                    ProviderError::quota_exceeded(provider, message)
                } else {
                    let retry_after = Self::extract_retry_after(payload.as_ref());
                    ProviderError::rate_limit(provider, message, retry_after)
                }
            }
            400 => ProviderError::invalid_request(provider, message),
            _ => ProviderError::api_error(provider, status, message),
        }
    }

    /// A 429 whose payload carries a QuotaFailure detail is a plan limit,
    /// not a transient rate limit
    fn is_quota_failure(payload: Option<&serde_json::Value>) -> bool {
        payload
            .and_then(|p| p.get("error"))
            .and_then(|e| e.get("details"))
            .and_then(|d| d.as_array())
            .map(|details| {
                details.iter().any(|d| {
                    d.get("@type")
                        .and_then(|t| t.as_str())
                        .is_some_and(|t| t.ends_with("QuotaFailure"))
                })
            })
            .unwrap_or(false)
    }

    fn extract_retry_after(payload: Option<&serde_json::Value>) -> Option<u64> {
        let error = payload?.get("error")?;

        if let Some(retry_after) = error.get("retry_after").and_then(|v| v.as_u64()) {
            return Some(retry_after);
        }

        // RetryInfo detail carries a "retryDelay" like "14s"
        error
            .get("details")?
            .as_array()?
            .iter()
            .find_map(|d| d.get("retryDelay"))
            .and_then(|v| v.as_str())
            .and_then(|s| s.trim_end_matches('s').parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_status_mapping() {
        let err = ProviderErrorMapper::from_http_status("gemini", 401, "Unauthorized");
        assert!(matches!(err, ProviderError::Authentication { provider, .. } if provider == "gemini"));

        let err = ProviderErrorMapper::from_http_status("gemini", 404, "no such model");
        assert!(matches!(err, ProviderError::ModelNotFound { .. }));

        let err = ProviderErrorMapper::from_http_status("gemini", 400, "bad prompt");
        assert!(matches!(err, ProviderError::InvalidRequest { .. }));

        let err = ProviderErrorMapper::from_http_status("gemini", 503, "down");
        assert!(matches!(err, ProviderError::ApiError { status: 503, .. }));
    }

    #[test]
    fn rate_limit_with_retry_delay() {
        let body = json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "status": "RESOURCE_EXHAUSTED",
                "details": [{"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "14s"}]
            }
        })
        .to_string();

        let err = ProviderErrorMapper::from_http_status("gemini", 429, &body);
        match err {
            ProviderError::RateLimit { retry_after, .. } => assert_eq!(retry_after, Some(14)),
            other => panic!("expected rate limit, got {:?}", other),
        }
    }

    #[test]
    fn quota_failure_detail_maps_to_quota_exceeded() {
        let body = json!({
            "error": {
                "code": 429,
                "message": "Quota exceeded for requests per day",
                "status": "RESOURCE_EXHAUSTED",
                "details": [{"@type": "type.googleapis.com/google.rpc.QuotaFailure"}]
            }
        })
        .to_string();

        let err = ProviderErrorMapper::from_http_status("gemini", 429, &body);
        assert!(matches!(err, ProviderError::QuotaExceeded { .. }));
    }

    #[test]
    fn unparseable_body_keeps_raw_message() {
        let err = ProviderErrorMapper::from_http_status("gemini", 500, "plain text failure");
        match err {
            ProviderError::ApiError { message, .. } => assert_eq!(message, "plain text failure"),
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn retryable_classification() {
        assert!(ProviderError::rate_limit("gemini", "slow", None).is_retryable());
        assert!(ProviderError::network("gemini", "reset").is_retryable());
        assert!(!ProviderError::model_not_found("gemini", "x").is_retryable());
        assert!(!ProviderError::quota_exceeded("gemini", "plan").is_retryable());
    }
}
