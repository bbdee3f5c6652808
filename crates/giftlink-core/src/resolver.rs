//! Outbound share-link resolution
//!
//! Follows redirects on the external host with bounded retries, linear
//! backoff, and a rotating pool of client identity strings. The transport
//! sits behind [`RedirectProbe`] so tests can script attempt outcomes
//! without the network or real elapsed time.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::redirect;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::error::CoreError;

/// Mobile browser identities rotated across attempts
pub const DEFAULT_IDENTITIES: &[&str] = &[
    "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Android 11; Mobile; rv:94.0) Gecko/94.0 Firefox/94.0",
    "Mozilla/5.0 (Linux; Android 11; SM-G991B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/95.0.4638.74 Mobile Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_7_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.2 Mobile/15E148 Safari/604.1",
];

/// Configuration for outbound resolution behavior.
#[derive(Debug, Clone)]
pub struct ResolvePolicy {
    /// Total attempts before giving up (including the first).
    pub max_attempts: u32,
    /// Base delay for linear backoff: the wait after attempt `n` is
    /// `base_delay * n`.
    pub base_delay: Duration,
    /// Total budget for a single attempt, redirects included.
    pub per_attempt_timeout: Duration,
    /// Connect timeout within an attempt.
    pub connect_timeout: Duration,
    /// Redirect hop cap per attempt.
    pub max_redirects: usize,
    /// Client identity strings, selected as `identities[(attempt-1) % len]`.
    pub identities: Vec<String>,
}

impl Default for ResolvePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            per_attempt_timeout: Duration::from_secs(45),
            connect_timeout: Duration::from_secs(30),
            max_redirects: 10,
            identities: DEFAULT_IDENTITIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ResolvePolicy {
    /// Create a new resolution policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total number of attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the base delay for linear backoff.
    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the per-attempt total timeout.
    #[must_use]
    pub fn with_per_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.per_attempt_timeout = timeout;
        self
    }

    /// Set the identity pool.
    #[must_use]
    pub fn with_identities(mut self, identities: Vec<String>) -> Self {
        if !identities.is_empty() {
            self.identities = identities;
        }
        self
    }

    /// Delay before the attempt after `attempt` (1-based): linear backoff.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Identity for a 1-based attempt number, cycling through the pool.
    #[must_use]
    pub fn identity_for_attempt(&self, attempt: u32) -> &str {
        if self.identities.is_empty() {
            return DEFAULT_IDENTITIES[0];
        }
        let index = attempt.saturating_sub(1) as usize % self.identities.len();
        &self.identities[index]
    }
}

/// Why a single probe attempt failed
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Transport-level failure (connect, timeout, redirect cap, TLS)
    #[error("transport error: {0}")]
    Transport(String),

    /// Transport completed but the final status was outside [200, 400)
    #[error("unexpected status {0}")]
    Status(u16),
}

/// One redirect-following attempt against the external host
#[async_trait]
pub trait RedirectProbe: Send + Sync {
    /// Follow `url` to its final location using the given identity string;
    /// returns the final effective URL on success.
    async fn follow(&self, url: &Url, identity: &str) -> Result<Url, ProbeError>;
}

/// reqwest-backed probe issuing header-only requests
#[derive(Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    /// Build a probe from a resolution policy.
    pub fn new(policy: &ResolvePolicy) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert("DNT", HeaderValue::from_static("1"));
        headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));

        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::limited(policy.max_redirects))
            .connect_timeout(policy.connect_timeout)
            .timeout(policy.per_attempt_timeout)
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }
}

#[async_trait]
impl RedirectProbe for HttpProbe {
    async fn follow(&self, url: &Url, identity: &str) -> Result<Url, ProbeError> {
        // Header-only request: the final location is all we need.
        let response = self
            .client
            .head(url.clone())
            .header(USER_AGENT, identity)
            .send()
            .await
            .map_err(|err| ProbeError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        if (200..400).contains(&status) {
            Ok(response.url().clone())
        } else {
            Err(ProbeError::Status(status))
        }
    }
}

/// Redirect resolver with retry, backoff, and identity rotation
#[derive(Clone)]
pub struct LinkResolver<P = HttpProbe> {
    probe: P,
    policy: ResolvePolicy,
}

impl LinkResolver<HttpProbe> {
    /// Create a resolver with the HTTP probe.
    pub fn new(policy: ResolvePolicy) -> Self {
        let probe = HttpProbe::new(&policy);
        Self { probe, policy }
    }
}

impl<P: RedirectProbe> LinkResolver<P> {
    /// Create a resolver over a custom probe.
    pub fn with_probe(probe: P, policy: ResolvePolicy) -> Self {
        Self { probe, policy }
    }

    /// The active policy.
    pub fn policy(&self) -> &ResolvePolicy {
        &self.policy
    }

    /// Resolve `url` to its final location.
    ///
    /// Returns on the first successful attempt; otherwise waits
    /// `base_delay * attempt` and retries with the next identity until the
    /// attempt budget is exhausted.
    pub async fn resolve(&self, url: &Url) -> Result<Url, CoreError> {
        let attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=attempts {
            let identity = self.policy.identity_for_attempt(attempt);

            match self.probe.follow(url, identity).await {
                Ok(final_url) => {
                    tracing::debug!(attempt, final_url = %final_url, "share link resolved");
                    return Ok(final_url);
                }
                Err(err) => {
                    warn!(
                        attempt,
                        max_attempts = attempts,
                        error = %err,
                        "share link probe failed"
                    );
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.policy.delay_for_attempt(attempt)).await;
            }
        }

        Err(CoreError::ResolutionFailed { attempts })
    }
}

impl<P> std::fmt::Debug for LinkResolver<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkResolver")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
