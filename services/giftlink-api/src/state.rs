//! Application state for the gift-link API service.

use giftlink_core::GiftLinkService;
use giftlink_db::{DbPool, PgAccessLedger};
use std::sync::Arc;

use crate::config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Gift-link service (entitlement, resolution, composition, handoff)
    pub service: Arc<GiftLinkService<PgAccessLedger>>,
    /// Database pool (readiness probe)
    pub pool: DbPool,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(service: GiftLinkService<PgAccessLedger>, pool: DbPool, config: Config) -> Self {
        Self {
            service: Arc::new(service),
            pool,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
