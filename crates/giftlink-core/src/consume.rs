//! Write-side generation consumption
//!
//! Mirrors the resolver's priority order, but every metered branch is a
//! single conditional mutation at the store. There is no check-then-write
//! window: under concurrent calls for the same user, the store's
//! affected-row result decides the winner.

use chrono::{DateTime, Utc};
use giftlink_db::AccessLedger;
use giftlink_types::{Tier, UserId};
use std::sync::Arc;

use crate::config::GenerationPolicy;
use crate::error::CoreError;

/// Outcome of one consumption attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// One generation was granted against this tier
    Consumed(Tier),
    /// No tier had a unit available
    Denied,
}

impl ConsumeOutcome {
    /// The tier consumed, if any
    pub fn tier(&self) -> Option<Tier> {
        match self {
            Self::Consumed(tier) => Some(*tier),
            Self::Denied => None,
        }
    }
}

/// Atomic consumption transaction over the access ledger
#[derive(Clone)]
pub struct GenerationConsumption<L> {
    ledger: Arc<L>,
    policy: GenerationPolicy,
}

impl<L: AccessLedger> GenerationConsumption<L> {
    /// Create a new consumption transaction
    pub fn new(ledger: Arc<L>, policy: GenerationPolicy) -> Self {
        Self { ledger, policy }
    }

    /// Spend one unit of entitlement for `user_id` at `now`.
    ///
    /// Unlimited grants consume nothing; the metered branches each issue one
    /// conditional statement and move on when it reports no row claimed.
    /// Ledger failures abort the attempt with an error so the caller can
    /// distinguish "denied, purchase" from "transient, retry".
    pub async fn consume(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<ConsumeOutcome, CoreError> {
        let id = user_id.0;

        if self.ledger.find_active_permanent(id).await?.is_some() {
            tracing::debug!(user_id = %user_id, "generation covered by permanent grant");
            return Ok(ConsumeOutcome::Consumed(Tier::Permanent));
        }

        self.ledger.expire_timed(id, now).await?;
        if self.ledger.find_active_timed(id, now).await?.is_some() {
            tracing::debug!(user_id = %user_id, "generation covered by timed grant");
            return Ok(ConsumeOutcome::Consumed(Tier::Timed));
        }

        let limit = self.policy.daily_free_limit;
        if limit > 0 && self.ledger.try_use_free(id, now.date_naive(), limit).await? {
            tracing::debug!(user_id = %user_id, "free generation claimed");
            return Ok(ConsumeOutcome::Consumed(Tier::Free));
        }

        if self.ledger.try_spend_token(id).await? {
            tracing::debug!(user_id = %user_id, "token spent");
            return Ok(ConsumeOutcome::Consumed(Tier::Token));
        }

        tracing::debug!(user_id = %user_id, "no entitlement available");
        Ok(ConsumeOutcome::Denied)
    }
}

impl<L> std::fmt::Debug for GenerationConsumption<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConsumption")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
