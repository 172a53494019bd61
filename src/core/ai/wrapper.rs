//! Primary/fallback failover around the provider client
//!
//! Holds up to two credentialed clients. Generation failures on the
//! primary increment a consecutive-failure counter; at the threshold the
//! fallback is probed and, if live, becomes the active credential. The
//! switch is one-way: only [`AiClientWrapper::reset_to_primary`] returns
//! to the primary, never an automatic re-probe.

use super::client::ProviderClient;
use super::error::ProviderError;
use crate::config::AiConfig;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

const PROVIDER: &str = "gemini";

/// Failover state, guarded by a mutex for cross-thread use
#[derive(Debug, Default, Clone)]
struct AiClientState {
    using_fallback: bool,
    consecutive_failures: u32,
}

/// Status snapshot exposed for observability
#[derive(Debug, Clone, Serialize)]
pub struct AiClientStatus {
    /// Whether the fallback credential is currently active
    pub using_fallback: bool,
    /// Consecutive primary failures since the last success or reset
    pub primary_failures: u32,
    /// Primary credential configured
    pub primary_available: bool,
    /// Fallback credential configured
    pub fallback_available: bool,
    /// Which credential the next call will use
    pub active_key: &'static str,
}

impl std::fmt::Display for AiClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "active={} fallback_active={} primary_failures={}",
            self.active_key, self.using_fallback, self.primary_failures
        )
    }
}

/// Result of a successful generation
#[derive(Debug, Clone)]
pub struct Generation {
    /// The generated text
    pub text: String,
    /// Whether the fallback credential produced it
    pub used_fallback: bool,
}

/// AI client with credential failover and bounded retry
#[derive(Debug)]
pub struct AiClientWrapper {
    primary: Option<ProviderClient>,
    fallback: Option<ProviderClient>,
    state: Mutex<AiClientState>,
    max_attempts: u32,
    max_primary_failures: u32,
}

impl AiClientWrapper {
    /// Build clients for whichever credentials are configured
    pub fn from_config(config: &AiConfig) -> Result<Self, ProviderError> {
        let primary = config
            .primary_api_key
            .as_deref()
            .map(|key| ProviderClient::new(key, config))
            .transpose()?;
        let fallback = config
            .fallback_api_key
            .as_deref()
            .map(|key| ProviderClient::new(key, config))
            .transpose()?;

        if primary.is_none() && fallback.is_none() {
            info!("no AI credentials configured, generation disabled");
        } else if fallback.is_none() {
            info!("no fallback AI credential configured, failover disabled");
        }

        Ok(Self {
            primary,
            fallback,
            state: Mutex::new(AiClientState::default()),
            max_attempts: config.max_attempts,
            max_primary_failures: config.max_primary_failures,
        })
    }

    /// Generate text with bounded retry and failover
    ///
    /// Fails fast with `NoCredentials` when neither key is configured, so
    /// no network call is ever attempted in that state.
    pub async fn generate_content(&self, prompt: &str) -> Result<Generation, ProviderError> {
        let mut last_error = match (self.primary.as_ref(), self.fallback.as_ref()) {
            (None, None) => return Err(ProviderError::NoCredentials { provider: PROVIDER }),
            _ => None,
        };

        for attempt in 1..=self.max_attempts {
            let (client, on_fallback) = self.active_client();

            match client.generate(prompt).await {
                Ok(text) => {
                    if !on_fallback {
                        self.state.lock().consecutive_failures = 0;
                    }
                    return Ok(Generation {
                        text,
                        used_fallback: on_fallback,
                    });
                }
                Err(err) => {
                    warn!(attempt, error = %err, on_fallback, "generation attempt failed");

                    if !on_fallback {
                        let failures = {
                            let mut state = self.state.lock();
                            state.consecutive_failures += 1;
                            state.consecutive_failures
                        };

                        if failures >= self.max_primary_failures {
                            if let Some(result) = self.try_failover(prompt).await {
                                return result;
                            }
                        }
                    }

                    // A retry against the same credential cannot clear
                    // auth, quota, or bad-model failures.
                    let retryable = err.is_retryable();
                    last_error = Some(err);
                    if !retryable {
                        break;
                    }
                }
            }
        }

        let err = last_error
            .unwrap_or_else(|| ProviderError::NoCredentials { provider: PROVIDER });
        tracing::error!(status = %self.status(), error = %err, "generation failed after all attempts");
        Err(err)
    }

    /// Probe the fallback and, if live, switch to it and retry once
    ///
    /// Returns `None` when no switch happened (no fallback configured,
    /// already active, or the probe failed) so the caller keeps going with
    /// its own retry budget.
    async fn try_failover(
        &self,
        prompt: &str,
    ) -> Option<Result<Generation, ProviderError>> {
        let fallback = self.fallback.as_ref()?;
        if self.state.lock().using_fallback {
            return None;
        }

        match fallback.probe().await {
            Ok(()) => {
                info!("fallback credential is live, switching");
                {
                    let mut state = self.state.lock();
                    state.using_fallback = true;
                    state.consecutive_failures = 0;
                }
                Some(fallback.generate(prompt).await.map(|text| Generation {
                    text,
                    used_fallback: true,
                }))
            }
            Err(err) => {
                warn!(error = %err, "fallback liveness probe failed, staying on primary");
                None
            }
        }
    }

    /// The client the next call will use
    fn active_client(&self) -> (&ProviderClient, bool) {
        let using_fallback = self.state.lock().using_fallback;
        match (&self.primary, &self.fallback) {
            (Some(primary), Some(fallback)) => {
                if using_fallback {
                    (fallback, true)
                } else {
                    (primary, false)
                }
            }
            (Some(primary), None) => (primary, false),
            // Degraded mode: only the fallback key exists
            (None, Some(fallback)) => (fallback, true),
            (None, None) => unreachable!("generate_content fails fast without credentials"),
        }
    }

    /// Snapshot of the failover state
    pub fn status(&self) -> AiClientStatus {
        let state = self.state.lock();
        let active_key = match (&self.primary, &self.fallback) {
            (None, None) => "none",
            (Some(_), _) if !state.using_fallback => "primary",
            (_, Some(_)) => "fallback",
            (Some(_), None) => "primary",
        };

        AiClientStatus {
            using_fallback: state.using_fallback,
            primary_failures: state.consecutive_failures,
            primary_available: self.primary.is_some(),
            fallback_available: self.fallback.is_some(),
            active_key,
        }
    }

    /// Explicitly return to the primary credential
    pub fn reset_to_primary(&self) {
        let mut state = self.state.lock();
        if state.using_fallback {
            info!("resetting AI client to primary credential");
        }
        state.using_fallback = false;
        state.consecutive_failures = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_keys() -> AiConfig {
        AiConfig::default()
    }

    #[tokio::test]
    async fn no_credentials_fails_fast() {
        let wrapper = AiClientWrapper::from_config(&config_without_keys()).unwrap();
        let err = wrapper.generate_content("prompt").await.unwrap_err();
        assert!(matches!(err, ProviderError::NoCredentials { .. }));

        let status = wrapper.status();
        assert_eq!(status.active_key, "none");
        assert!(!status.primary_available);
        assert!(!status.fallback_available);
    }

    #[test]
    fn status_reflects_configured_keys() {
        let config = AiConfig {
            primary_api_key: Some("p".to_string()),
            fallback_api_key: Some("f".to_string()),
            ..AiConfig::default()
        };
        let wrapper = AiClientWrapper::from_config(&config).unwrap();
        let status = wrapper.status();
        assert!(status.primary_available);
        assert!(status.fallback_available);
        assert_eq!(status.active_key, "primary");
        assert!(!status.using_fallback);
    }

    #[test]
    fn reset_clears_state() {
        let config = AiConfig {
            primary_api_key: Some("p".to_string()),
            fallback_api_key: Some("f".to_string()),
            ..AiConfig::default()
        };
        let wrapper = AiClientWrapper::from_config(&config).unwrap();
        {
            let mut state = wrapper.state.lock();
            state.using_fallback = true;
            state.consecutive_failures = 2;
        }

        wrapper.reset_to_primary();
        let status = wrapper.status();
        assert!(!status.using_fallback);
        assert_eq!(status.primary_failures, 0);
        assert_eq!(status.active_key, "primary");
    }
}
