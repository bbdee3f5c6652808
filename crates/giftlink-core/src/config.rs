//! Configuration types for the generation core

use std::time::Duration;

use crate::resolver::ResolvePolicy;

/// Default pending-handoff lifetime
pub const DEFAULT_HANDOFF_TTL: Duration = Duration::from_secs(300);

/// Metering policy for generations
#[derive(Debug, Clone)]
pub struct GenerationPolicy {
    /// Free generations per user per day
    pub daily_free_limit: i64,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            daily_free_limit: 1,
        }
    }
}

impl GenerationPolicy {
    /// Set the daily free allowance
    #[must_use]
    pub fn with_daily_free_limit(mut self, limit: i64) -> Self {
        self.daily_free_limit = limit;
        self
    }
}

/// Configuration for the gift-link service facade
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Share links must carry a host under this domain
    pub share_host: String,
    /// Lifetime of a pending handoff before it expires unredeemed
    pub handoff_ttl: Duration,
    /// Metering policy
    pub policy: GenerationPolicy,
    /// Outbound resolution policy
    pub resolve: ResolvePolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            share_host: "temu.com".to_string(),
            handoff_ttl: DEFAULT_HANDOFF_TTL,
            policy: GenerationPolicy::default(),
            resolve: ResolvePolicy::default(),
        }
    }
}

impl ServiceConfig {
    /// Set the accepted share-link domain
    #[must_use]
    pub fn with_share_host(mut self, host: impl Into<String>) -> Self {
        self.share_host = host.into();
        self
    }

    /// Set the pending-handoff lifetime
    #[must_use]
    pub fn with_handoff_ttl(mut self, ttl: Duration) -> Self {
        self.handoff_ttl = ttl;
        self
    }

    /// Set the metering policy
    #[must_use]
    pub fn with_policy(mut self, policy: GenerationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the resolution policy
    #[must_use]
    pub fn with_resolve_policy(mut self, resolve: ResolvePolicy) -> Self {
        self.resolve = resolve;
        self
    }
}
