//! Read-side entitlement resolution
//!
//! The priority cascade is an ordered list of pure tier evaluators over a
//! ledger snapshot, so the ordering is unit-testable without a store. The
//! resolver performs lazy expiry of overdue timed grants as part of loading
//! the snapshot; everything after that is pure.

use chrono::{DateTime, Utc};
use giftlink_db::{AccessLedger, DbResult, PermanentGrantRow, TimedGrantRow};
use giftlink_types::{EntitlementStatus, MeteredSource, UnlimitedSource, UserId};
use std::sync::Arc;

use crate::config::GenerationPolicy;

/// One-pass read of everything the cascade consults
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    /// Active permanent grant, if any
    pub permanent: Option<PermanentGrantRow>,
    /// Live timed grant, if any
    pub timed: Option<TimedGrantRow>,
    /// Free generations already used today
    pub free_used: i64,
    /// Prepaid token balance
    pub tokens: i64,
}

/// A pure tier evaluator: `Some(status)` claims the decision, `None` passes
/// to the next evaluator.
pub type TierEvaluator =
    fn(&LedgerSnapshot, DateTime<Utc>, &GenerationPolicy) -> Option<EntitlementStatus>;

/// The cascade, highest priority first
pub const TIER_EVALUATORS: &[TierEvaluator] =
    &[permanent_grant, timed_grant, daily_free, token_balance];

fn permanent_grant(
    snapshot: &LedgerSnapshot,
    _now: DateTime<Utc>,
    _policy: &GenerationPolicy,
) -> Option<EntitlementStatus> {
    snapshot.permanent.as_ref().map(|_| EntitlementStatus::Unlimited {
        source: UnlimitedSource::Permanent,
        remaining_seconds: None,
    })
}

fn timed_grant(
    snapshot: &LedgerSnapshot,
    now: DateTime<Utc>,
    _policy: &GenerationPolicy,
) -> Option<EntitlementStatus> {
    snapshot
        .timed
        .as_ref()
        .filter(|grant| grant.is_live(now))
        .map(|grant| EntitlementStatus::Unlimited {
            source: UnlimitedSource::Timed,
            remaining_seconds: Some((grant.end_time - now).num_seconds()),
        })
}

fn daily_free(
    snapshot: &LedgerSnapshot,
    _now: DateTime<Utc>,
    policy: &GenerationPolicy,
) -> Option<EntitlementStatus> {
    let remaining = policy.daily_free_limit - snapshot.free_used;
    (remaining > 0).then_some(EntitlementStatus::Metered {
        source: MeteredSource::Free,
        remaining,
    })
}

fn token_balance(
    snapshot: &LedgerSnapshot,
    _now: DateTime<Utc>,
    _policy: &GenerationPolicy,
) -> Option<EntitlementStatus> {
    (snapshot.tokens > 0).then_some(EntitlementStatus::Metered {
        source: MeteredSource::Tokens,
        remaining: snapshot.tokens,
    })
}

/// Run the cascade over a snapshot; first match wins
pub fn evaluate(
    snapshot: &LedgerSnapshot,
    now: DateTime<Utc>,
    policy: &GenerationPolicy,
) -> EntitlementStatus {
    TIER_EVALUATORS
        .iter()
        .find_map(|evaluator| evaluator(snapshot, now, policy))
        .unwrap_or(EntitlementStatus::Denied)
}

/// Read-side entitlement resolver over the access ledger
#[derive(Clone)]
pub struct EntitlementResolver<L> {
    ledger: Arc<L>,
    policy: GenerationPolicy,
}

impl<L: AccessLedger> EntitlementResolver<L> {
    /// Create a new resolver
    pub fn new(ledger: Arc<L>, policy: GenerationPolicy) -> Self {
        Self { ledger, policy }
    }

    /// Evaluate the user's entitlement at `now`.
    ///
    /// Fails closed: if the ledger is unreachable this returns `Denied`
    /// rather than guessing, so an outage can never hand out unlimited
    /// access.
    pub async fn resolve(&self, user_id: UserId, now: DateTime<Utc>) -> EntitlementStatus {
        match self.snapshot(user_id, now).await {
            Ok(snapshot) => evaluate(&snapshot, now, &self.policy),
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "ledger unreachable, failing closed");
                EntitlementStatus::Denied
            }
        }
    }

    /// Load the cascade's inputs in one pass, expiring overdue timed grants
    /// first so the snapshot never carries a stale-active window.
    pub async fn snapshot(&self, user_id: UserId, now: DateTime<Utc>) -> DbResult<LedgerSnapshot> {
        let id = user_id.0;

        self.ledger.expire_timed(id, now).await?;

        let permanent = self.ledger.find_active_permanent(id).await?;
        let timed = self.ledger.find_active_timed(id, now).await?;
        let free_used = self.ledger.free_used_on(id, now.date_naive()).await?;
        let tokens = self
            .ledger
            .token_balance(id)
            .await?
            .map_or(0, |balance| balance.tokens);

        Ok(LedgerSnapshot {
            permanent,
            timed,
            free_used,
            tokens,
        })
    }
}

impl<L> std::fmt::Debug for EntitlementResolver<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntitlementResolver")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
