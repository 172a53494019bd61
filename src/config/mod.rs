//! Configuration management for the report service
//!
//! Configuration can be loaded from a YAML file or assembled from
//! environment variables. Operating constants (quota limits, cache TTL,
//! throttle intervals) are defaults here so tests and deployments can
//! tune them.

use crate::utils::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration struct for the report service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Relational store settings
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Generative-AI provider settings
    #[serde(default)]
    pub ai: AiConfig,
    /// Local request quota windows
    #[serde(default)]
    pub quota: QuotaConfig,
    /// Aggregation cache settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// Report store settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ReportError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ReportError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Absent AI credentials are not an error: the service degrades to a
    /// reduced-capability mode instead of refusing to start.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Config::default();

        if let Ok(url) = std::env::var("LOGICORE_DATABASE_URL") {
            config.database.url = url;
        }
        config.ai.primary_api_key = std::env::var("LOGICORE_AI_API_KEY").ok();
        config.ai.fallback_api_key = std::env::var("LOGICORE_AI_FALLBACK_KEY").ok();
        if let Ok(model) = std::env::var("LOGICORE_AI_MODEL") {
            config.ai.model = model;
        }
        if let Ok(base_url) = std::env::var("LOGICORE_AI_BASE_URL") {
            config.ai.base_url = base_url;
        }
        if let Ok(dir) = std::env::var("LOGICORE_REPORTS_DIR") {
            config.storage.reports_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        if self.quota.max_per_minute == 0 || self.quota.max_per_hour == 0 {
            return Err(ReportError::Config(
                "quota limits must be greater than 0".to_string(),
            ));
        }
        if self.cache.ttl_secs == 0 {
            return Err(ReportError::Config(
                "cache ttl_secs must be greater than 0".to_string(),
            ));
        }
        if self.ai.max_attempts == 0 {
            return Err(ReportError::Config(
                "ai.max_attempts must be greater than 0".to_string(),
            ));
        }
        if self.ai.base_url.is_empty() || self.ai.model.is_empty() {
            return Err(ReportError::Config(
                "ai.base_url and ai.model must be set".to_string(),
            ));
        }

        Ok(())
    }
}

/// Relational database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (postgres://...)
    pub url: String,
    /// Maximum pool connections
    pub max_connections: u32,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/logicore".to_string(),
            max_connections: 10,
            connect_timeout_secs: 10,
        }
    }
}

/// Generative-AI provider configuration
///
/// Either credential may be absent. Missing fallback means no failover;
/// missing both means AI generation is disabled and calls fail fast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Primary API key
    pub primary_api_key: Option<String>,
    /// Fallback API key used after repeated primary failures
    pub fallback_api_key: Option<String>,
    /// Model name passed to the provider
    pub model: String,
    /// Provider base URL
    pub base_url: String,
    /// Cap on generated tokens, forwarded to the provider when set
    pub max_output_tokens: Option<u32>,
    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
    /// HTTP connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Attempts per generation call (including the first)
    pub max_attempts: u32,
    /// Consecutive primary failures before the fallback is probed
    pub max_primary_failures: u32,
    /// Minimum spacing between AI calls across all reports, in seconds
    pub min_call_interval_secs: u64,
    /// Overall deadline for one AI call, in seconds
    pub call_timeout_secs: u64,
    /// Pause between the two reports of a scheduled batch, in seconds
    pub scheduled_delay_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            primary_api_key: None,
            fallback_api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            max_output_tokens: None,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_attempts: 2,
            max_primary_failures: 3,
            min_call_interval_secs: 10,
            call_timeout_secs: 30,
            scheduled_delay_secs: 5,
        }
    }
}

/// Local quota window limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Maximum AI requests per minute
    pub max_per_minute: u32,
    /// Maximum AI requests per hour
    pub max_per_hour: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_per_minute: 8,
            max_per_hour: 15,
        }
    }
}

/// Aggregation cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

/// Report store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per report
    pub reports_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("./reports"),
        }
    }
}
