//! Scripted redirect probes for testing

use async_trait::async_trait;
use url::Url;

use giftlink_core::{ProbeError, RedirectProbe};

/// Probe that always resolves to a fixed final URL
pub struct StaticProbe {
    pub final_url: Url,
}

impl StaticProbe {
    pub fn resolving_to(final_url: &str) -> Self {
        Self {
            final_url: Url::parse(final_url).expect("valid test URL"),
        }
    }
}

#[async_trait]
impl RedirectProbe for StaticProbe {
    async fn follow(&self, _url: &Url, _identity: &str) -> Result<Url, ProbeError> {
        Ok(self.final_url.clone())
    }
}

/// Probe that fails every attempt
pub struct FailingProbe;

#[async_trait]
impl RedirectProbe for FailingProbe {
    async fn follow(&self, _url: &Url, _identity: &str) -> Result<Url, ProbeError> {
        Err(ProbeError::Transport("connection reset".to_string()))
    }
}
