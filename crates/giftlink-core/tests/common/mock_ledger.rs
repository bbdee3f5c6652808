//! In-memory access ledger for testing
//!
//! The conditional mutations go through DashMap entries, whose shard locks
//! make each check-and-write a critical section — the same guarantee the
//! SQL statements give in production.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use giftlink_db::{
    CreatePermanentGrant, CreateTimedGrant, DailyFreeRepository, DailyFreeRow, DbError, DbResult,
    PermanentGrantRepository, PermanentGrantRow, TimedGrantRepository, TimedGrantRow,
    TokenBalanceRepository, TokenBalanceRow,
};
use giftlink_types::TimedKind;

/// In-memory ledger over all four grant kinds
#[derive(Default, Clone)]
pub struct MockAccessLedger {
    permanent: Arc<DashMap<Uuid, PermanentGrantRow>>,
    timed: Arc<DashMap<Uuid, Vec<TimedGrantRow>>>,
    daily: Arc<DashMap<(Uuid, NaiveDate), DailyFreeRow>>,
    tokens: Arc<DashMap<Uuid, TokenBalanceRow>>,
    unavailable: Arc<AtomicBool>,
}

impl MockAccessLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store going down: every call fails until cleared.
    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    fn check_available(&self) -> DbResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(DbError::Unavailable("mock store offline".to_string()))
        } else {
            Ok(())
        }
    }

    /// Seed an active permanent grant
    pub fn seed_permanent(&self, user_id: Uuid) {
        self.permanent.insert(
            user_id,
            PermanentGrantRow {
                id: Uuid::new_v4(),
                user_id,
                purchased_at: Utc::now(),
                amount_paid_cents: 29_900,
                active: true,
                created_at: Utc::now(),
            },
        );
    }

    /// Seed a timed grant starting at `start` for the kind's window
    pub fn seed_timed(&self, user_id: Uuid, kind: TimedKind, start: DateTime<Utc>) {
        let row = TimedGrantRow {
            id: Uuid::new_v4(),
            user_id,
            kind: kind.as_str().to_string(),
            start_time: start,
            end_time: start + kind.duration(),
            active: true,
            created_at: start,
        };
        self.timed.entry(user_id).or_default().push(row);
    }

    /// Seed a token balance
    pub fn seed_tokens(&self, user_id: Uuid, tokens: i64) {
        self.tokens.insert(
            user_id,
            TokenBalanceRow {
                user_id,
                tokens,
                total_consumed: 0,
                updated_at: Utc::now(),
            },
        );
    }

    /// Seed an already-used free counter for the day
    pub fn seed_free_used(&self, user_id: Uuid, day: NaiveDate, used_count: i64) {
        self.daily.insert(
            (user_id, day),
            DailyFreeRow {
                id: Uuid::new_v4(),
                user_id,
                day,
                used_count,
                created_at: Utc::now(),
            },
        );
    }

    /// Count of the user's grants still flagged active
    pub fn active_timed_count(&self, user_id: Uuid) -> usize {
        self.timed
            .get(&user_id)
            .map_or(0, |rows| rows.iter().filter(|r| r.active).count())
    }
}

#[async_trait]
impl PermanentGrantRepository for MockAccessLedger {
    async fn find_active_permanent(&self, user_id: Uuid) -> DbResult<Option<PermanentGrantRow>> {
        self.check_available()?;
        Ok(self
            .permanent
            .get(&user_id)
            .filter(|row| row.active)
            .map(|row| row.value().clone()))
    }

    async fn grant_permanent(&self, grant: CreatePermanentGrant) -> DbResult<PermanentGrantRow> {
        self.check_available()?;
        let row = PermanentGrantRow {
            id: grant.id,
            user_id: grant.user_id,
            purchased_at: Utc::now(),
            amount_paid_cents: grant.amount_paid_cents,
            active: true,
            created_at: Utc::now(),
        };
        self.permanent.insert(grant.user_id, row.clone());
        Ok(row)
    }

    async fn revoke_permanent(&self, user_id: Uuid) -> DbResult<u64> {
        self.check_available()?;
        match self.permanent.get_mut(&user_id) {
            Some(mut row) if row.active => {
                row.active = false;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[async_trait]
impl TimedGrantRepository for MockAccessLedger {
    async fn find_active_timed(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> DbResult<Option<TimedGrantRow>> {
        self.check_available()?;
        Ok(self.timed.get(&user_id).and_then(|rows| {
            rows.iter()
                .filter(|row| row.is_live(now))
                .max_by_key(|row| row.end_time)
                .cloned()
        }))
    }

    async fn grant_timed(&self, grant: CreateTimedGrant) -> DbResult<TimedGrantRow> {
        self.check_available()?;
        let row = TimedGrantRow {
            id: grant.id,
            user_id: grant.user_id,
            kind: grant.kind,
            start_time: grant.start_time,
            end_time: grant.end_time,
            active: true,
            created_at: Utc::now(),
        };
        self.timed.entry(grant.user_id).or_default().push(row.clone());
        Ok(row)
    }

    async fn expire_timed(&self, user_id: Uuid, now: DateTime<Utc>) -> DbResult<u64> {
        self.check_available()?;
        let mut flipped = 0;
        if let Some(mut rows) = self.timed.get_mut(&user_id) {
            for row in rows.iter_mut() {
                if row.active && row.end_time <= now {
                    row.active = false;
                    flipped += 1;
                }
            }
        }
        Ok(flipped)
    }
}

#[async_trait]
impl DailyFreeRepository for MockAccessLedger {
    async fn free_used_on(&self, user_id: Uuid, day: NaiveDate) -> DbResult<i64> {
        self.check_available()?;
        Ok(self
            .daily
            .get(&(user_id, day))
            .map_or(0, |row| row.used_count))
    }

    async fn try_use_free(&self, user_id: Uuid, day: NaiveDate, limit: i64) -> DbResult<bool> {
        self.check_available()?;
        // The entry holds its shard lock across the check and the write.
        match self.daily.entry((user_id, day)) {
            Entry::Occupied(mut entry) => {
                if entry.get().used_count < limit {
                    entry.get_mut().used_count += 1;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(entry) => {
                if limit < 1 {
                    return Ok(false);
                }
                entry.insert(DailyFreeRow {
                    id: Uuid::new_v4(),
                    user_id,
                    day,
                    used_count: 1,
                    created_at: Utc::now(),
                });
                Ok(true)
            }
        }
    }

    async fn free_counter(&self, user_id: Uuid, day: NaiveDate) -> DbResult<Option<DailyFreeRow>> {
        self.check_available()?;
        Ok(self.daily.get(&(user_id, day)).map(|row| row.value().clone()))
    }
}

#[async_trait]
impl TokenBalanceRepository for MockAccessLedger {
    async fn token_balance(&self, user_id: Uuid) -> DbResult<Option<TokenBalanceRow>> {
        self.check_available()?;
        Ok(self.tokens.get(&user_id).map(|row| row.value().clone()))
    }

    async fn credit_tokens(&self, user_id: Uuid, amount: i64) -> DbResult<TokenBalanceRow> {
        self.check_available()?;
        let mut row = self.tokens.entry(user_id).or_insert_with(|| TokenBalanceRow {
            user_id,
            tokens: 0,
            total_consumed: 0,
            updated_at: Utc::now(),
        });
        row.tokens += amount;
        row.updated_at = Utc::now();
        Ok(row.value().clone())
    }

    async fn try_spend_token(&self, user_id: Uuid) -> DbResult<bool> {
        self.check_available()?;
        // Shard lock makes decrement-if-positive atomic.
        match self.tokens.get_mut(&user_id) {
            Some(mut row) if row.tokens > 0 => {
                row.tokens -= 1;
                row.total_consumed += 1;
                row.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
