//! Configuration for the gift-link API service.

use giftlink_core::{GenerationPolicy, ResolvePolicy, ServiceConfig};
use std::time::Duration;

/// Gift-link API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,
    /// Database URL
    pub database_url: String,
    /// Core service configuration
    pub service: ServiceConfig,
    /// Request timeout
    pub request_timeout: Duration,
    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        let share_host =
            std::env::var("SHARE_HOST").unwrap_or_else(|_| "temu.com".to_string());

        let daily_free_limit: i64 = std::env::var("DAILY_FREE_LIMIT")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("DAILY_FREE_LIMIT"))?;

        let handoff_ttl_secs: u64 = std::env::var("HANDOFF_TTL_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HANDOFF_TTL_SECS"))?;

        let resolve_max_attempts: u32 = std::env::var("RESOLVE_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("RESOLVE_MAX_ATTEMPTS"))?;

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        let metrics_enabled = std::env::var("METRICS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let service = ServiceConfig::default()
            .with_share_host(share_host)
            .with_handoff_ttl(Duration::from_secs(handoff_ttl_secs))
            .with_policy(GenerationPolicy::default().with_daily_free_limit(daily_free_limit))
            .with_resolve_policy(ResolvePolicy::new().with_max_attempts(resolve_max_attempts));

        Ok(Self {
            http_port,
            database_url,
            service,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
