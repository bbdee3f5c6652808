//! Single-use handoff capability
//!
//! The composed gift link is never rendered into a page. `store` parks it as
//! an opaque blob keyed by the caller's session; `redeem` removes and decodes
//! it in one step, so a capability is good for exactly one redirect. Pending
//! entries expire after a TTL so abandoned sessions do not accumulate.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use giftlink_types::SessionId;
use moka::future::Cache;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Handoff redemption failures
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HandoffError {
    /// No pending capability for this session
    #[error("no pending handoff for this session")]
    Missing,

    /// The stored blob did not decode to an absolute http(s) URL
    #[error("handoff payload did not decode to a usable link")]
    Invalid,
}

impl From<HandoffError> for crate::error::CoreError {
    fn from(err: HandoffError) -> Self {
        match err {
            HandoffError::Missing => Self::HandoffMissing,
            HandoffError::Invalid => Self::HandoffInvalid,
        }
    }
}

/// Session-scoped store of pending single-use capabilities
#[derive(Clone)]
pub struct SecureHandoff {
    pending: Cache<SessionId, String>,
}

impl SecureHandoff {
    /// Create a handoff store whose pending entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            pending: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(100_000)
                .build(),
        }
    }

    /// Park `url` for `session`, replacing any prior pending capability.
    pub async fn store(&self, session: SessionId, url: &str) {
        let blob = URL_SAFE_NO_PAD.encode(url.as_bytes());
        self.pending.insert(session, blob).await;
    }

    /// Redeem the session's pending capability.
    ///
    /// The entry is removed before decoding, so a second redeem (or a
    /// concurrent one) observes `Missing` rather than the URL.
    pub async fn redeem(&self, session: SessionId) -> Result<Url, HandoffError> {
        let blob = self
            .pending
            .remove(&session)
            .await
            .ok_or(HandoffError::Missing)?;

        let bytes = URL_SAFE_NO_PAD
            .decode(blob.as_bytes())
            .map_err(|_| HandoffError::Invalid)?;
        let text = String::from_utf8(bytes).map_err(|_| HandoffError::Invalid)?;

        let url = Url::parse(text.trim()).map_err(|_| HandoffError::Invalid)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HandoffError::Invalid);
        }

        Ok(url)
    }

    /// Whether the session currently has a pending capability.
    pub fn has_pending(&self, session: SessionId) -> bool {
        self.pending.contains_key(&session)
    }

    #[cfg(test)]
    async fn store_raw(&self, session: SessionId, blob: String) {
        self.pending.insert(session, blob).await;
    }
}

impl std::fmt::Debug for SecureHandoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureHandoff").finish_non_exhaustive()
    }
}
