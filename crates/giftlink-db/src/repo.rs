//! Ledger repository traits
//!
//! Async repository interfaces over the four grant kinds. Method names are
//! unique across traits so one store can implement all of them and be used
//! through the [`AccessLedger`] union bound.
//!
//! Every mutation that guards an invariant (free-counter cap, token
//! non-negativity) is a single conditional statement at the store; callers
//! must not reimplement the check-then-write sequence on top of reads.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::{DailyFreeRow, PermanentGrantRow, TimedGrantRow, TokenBalanceRow};

/// Permanent (lifetime) grant repository
#[async_trait]
pub trait PermanentGrantRepository: Send + Sync {
    /// Find the user's active permanent grant, if any
    async fn find_active_permanent(&self, user_id: Uuid) -> DbResult<Option<PermanentGrantRow>>;

    /// Record a purchased permanent grant (wallet path)
    async fn grant_permanent(&self, grant: CreatePermanentGrant) -> DbResult<PermanentGrantRow>;

    /// Deactivate a user's permanent grant (administrative action only)
    async fn revoke_permanent(&self, user_id: Uuid) -> DbResult<u64>;
}

/// Permanent grant input
#[derive(Debug, Clone)]
pub struct CreatePermanentGrant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_paid_cents: i64,
}

/// Timed grant repository
#[async_trait]
pub trait TimedGrantRepository: Send + Sync {
    /// Find the user's live timed grant at `now`, if any
    async fn find_active_timed(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> DbResult<Option<TimedGrantRow>>;

    /// Record a purchased timed window (wallet path)
    async fn grant_timed(&self, grant: CreateTimedGrant) -> DbResult<TimedGrantRow>;

    /// Lazily deactivate the user's overdue windows. Idempotent; returns the
    /// number of rows flipped this call.
    async fn expire_timed(&self, user_id: Uuid, now: DateTime<Utc>) -> DbResult<u64>;
}

/// Timed grant input
#[derive(Debug, Clone)]
pub struct CreateTimedGrant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Daily free allowance repository
#[async_trait]
pub trait DailyFreeRepository: Send + Sync {
    /// Free generations already used by the user on `day`
    async fn free_used_on(&self, user_id: Uuid, day: NaiveDate) -> DbResult<i64>;

    /// Atomically claim one free generation for (user, day): upsert the
    /// counter, incrementing only while below `limit`. Returns true when the
    /// increment happened, false when the counter was already at the limit.
    async fn try_use_free(&self, user_id: Uuid, day: NaiveDate, limit: i64) -> DbResult<bool>;

    /// The counter row for (user, day), if one exists
    async fn free_counter(&self, user_id: Uuid, day: NaiveDate) -> DbResult<Option<DailyFreeRow>>;
}

/// Token balance repository
#[async_trait]
pub trait TokenBalanceRepository: Send + Sync {
    /// The user's balance row, if one exists
    async fn token_balance(&self, user_id: Uuid) -> DbResult<Option<TokenBalanceRow>>;

    /// Credit purchased tokens (wallet path); creates the row on first credit
    async fn credit_tokens(&self, user_id: Uuid, amount: i64) -> DbResult<TokenBalanceRow>;

    /// Atomically spend one token: decrement and bump total_consumed in the
    /// same statement, only while tokens > 0. Returns true when a token was
    /// spent. The balance can never observe a negative value.
    async fn try_spend_token(&self, user_id: Uuid) -> DbResult<bool>;
}

/// Union of the four ledger repositories.
///
/// The entitlement resolver and the consumption transaction take one store
/// through this bound rather than four separate generics.
pub trait AccessLedger:
    PermanentGrantRepository + TimedGrantRepository + DailyFreeRepository + TokenBalanceRepository
{
}

impl<T> AccessLedger for T where
    T: PermanentGrantRepository
        + TimedGrantRepository
        + DailyFreeRepository
        + TokenBalanceRepository
{
}
