//! Gift-link service facade
//!
//! Wires the pipeline: validate the share link, consume one unit of
//! entitlement, resolve the final URL, compose the outbound link, and park
//! it behind the session's single-use handoff. Consumption always completes
//! before the first outbound request, so a slow external host never holds
//! ledger state.

use chrono::Utc;
use giftlink_db::AccessLedger;
use giftlink_types::{EntitlementStatus, SessionId, TemplateKind, Tier, UserId};
use std::sync::Arc;
use url::Url;

use crate::compose::{compose, ComposedLink};
use crate::config::ServiceConfig;
use crate::consume::{ConsumeOutcome, GenerationConsumption};
use crate::entitlement::EntitlementResolver;
use crate::error::CoreError;
use crate::handoff::SecureHandoff;
use crate::resolver::{HttpProbe, LinkResolver, RedirectProbe};

/// Result of a successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedLink {
    /// Tier the generation was charged against
    pub tier: Tier,
    /// Extracted product identifier, for display
    pub product_id: String,
    /// Template that was composed
    pub template: TemplateKind,
}

/// End-to-end gift-link service
pub struct GiftLinkService<L, P = HttpProbe> {
    entitlement: EntitlementResolver<L>,
    consumption: GenerationConsumption<L>,
    resolver: LinkResolver<P>,
    handoff: SecureHandoff,
    share_host: String,
}

impl<L: AccessLedger> GiftLinkService<L, HttpProbe> {
    /// Create a service over the given ledger with the HTTP probe.
    pub fn new(ledger: Arc<L>, config: ServiceConfig) -> Self {
        let resolver = LinkResolver::new(config.resolve.clone());
        Self::assemble(ledger, resolver, config)
    }
}

impl<L: AccessLedger, P: RedirectProbe> GiftLinkService<L, P> {
    /// Create a service over a custom probe.
    pub fn with_probe(ledger: Arc<L>, probe: P, config: ServiceConfig) -> Self {
        let resolver = LinkResolver::with_probe(probe, config.resolve.clone());
        Self::assemble(ledger, resolver, config)
    }

    fn assemble(ledger: Arc<L>, resolver: LinkResolver<P>, config: ServiceConfig) -> Self {
        Self {
            entitlement: EntitlementResolver::new(ledger.clone(), config.policy.clone()),
            consumption: GenerationConsumption::new(ledger, config.policy.clone()),
            resolver,
            handoff: SecureHandoff::new(config.handoff_ttl),
            share_host: config.share_host,
        }
    }

    /// Generate a gift link for the user and park it for the session.
    ///
    /// Consumption must succeed before any network call; once a unit is
    /// spent, resolution and composition failures surface per their own
    /// error classes.
    pub async fn generate(
        &self,
        user_id: UserId,
        session: SessionId,
        share_link: &str,
        template: TemplateKind,
    ) -> Result<GeneratedLink, CoreError> {
        let share_url = self.validate_share_link(share_link)?;
        let now = Utc::now();

        let tier = match self.consumption.consume(user_id, now).await? {
            ConsumeOutcome::Consumed(tier) => tier,
            ConsumeOutcome::Denied => return Err(CoreError::EntitlementDenied),
        };

        let final_url = self.resolver.resolve(&share_url).await?;
        let composed = compose(&final_url, template, Utc::now())?;

        self.handoff.store(session, &composed.url).await;

        tracing::info!(
            user_id = %user_id,
            tier = %tier,
            template = %template,
            product_id = %composed.product_id,
            "gift link generated"
        );

        Ok(GeneratedLink {
            tier,
            product_id: composed.product_id,
            template,
        })
    }

    /// Read-side entitlement status for the user.
    pub async fn entitlement(&self, user_id: UserId) -> EntitlementStatus {
        self.entitlement.resolve(user_id, Utc::now()).await
    }

    /// Spend one unit of entitlement without the rest of the pipeline; used
    /// where a collaborator drives resolution and delivery itself.
    pub async fn consume(&self, user_id: UserId) -> Result<ConsumeOutcome, CoreError> {
        self.consumption.consume(user_id, Utc::now()).await
    }

    /// Resolve and compose without consuming or parking; used where the
    /// caller manages entitlement and delivery itself.
    pub async fn resolve_and_compose(
        &self,
        share_link: &str,
        template: TemplateKind,
    ) -> Result<ComposedLink, CoreError> {
        let share_url = self.validate_share_link(share_link)?;
        let final_url = self.resolver.resolve(&share_url).await?;
        compose(&final_url, template, Utc::now())
    }

    /// Redeem the session's pending gift link; single-use.
    pub async fn redeem(&self, session: SessionId) -> Result<Url, CoreError> {
        let url = self.handoff.redeem(session).await?;
        tracing::debug!(session = %session, "handoff redeemed");
        Ok(url)
    }

    /// The handoff store, for wiring a dedicated redirect endpoint.
    pub fn handoff(&self) -> &SecureHandoff {
        &self.handoff
    }

    fn validate_share_link(&self, raw: &str) -> Result<Url, CoreError> {
        let url = Url::parse(raw.trim())
            .map_err(|_| CoreError::InvalidShareLink("not an absolute URL".to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::InvalidShareLink(
                "scheme must be http or https".to_string(),
            ));
        }

        let host = url
            .host_str()
            .ok_or_else(|| CoreError::InvalidShareLink("missing host".to_string()))?;
        if !host_matches(host, &self.share_host) {
            return Err(CoreError::InvalidShareLink(format!(
                "host must be under {}",
                self.share_host
            )));
        }

        Ok(url)
    }
}

impl<L, P> std::fmt::Debug for GiftLinkService<L, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GiftLinkService")
            .field("share_host", &self.share_host)
            .finish_non_exhaustive()
    }
}

/// True when `host` is `domain` itself or a subdomain of it. Suffix matching
/// alone is not enough: `eviltemu.com` must not pass for `temu.com`.
fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();

    host == domain
        || host
            .strip_suffix(&domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_matches_domain_and_subdomains() {
        assert!(host_matches("temu.com", "temu.com"));
        assert!(host_matches("share.temu.com", "temu.com"));
        assert!(host_matches("www.TEMU.com", "temu.com"));
    }

    #[test]
    fn test_host_rejects_lookalikes() {
        assert!(!host_matches("eviltemu.com", "temu.com"));
        assert!(!host_matches("temu.com.evil.example", "temu.com"));
        assert!(!host_matches("example.com", "temu.com"));
    }
}
