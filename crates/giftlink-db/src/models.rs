//! Ledger row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Permanent grant row: lifetime unlimited access, at most one per user
#[derive(Debug, Clone, FromRow)]
pub struct PermanentGrantRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub purchased_at: DateTime<Utc>,
    pub amount_paid_cents: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Timed grant row: unlimited access inside a purchased window
#[derive(Debug, Clone, FromRow)]
pub struct TimedGrantRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl TimedGrantRow {
    /// True while the window is active and has not passed `now`
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.active && self.end_time > now
    }
}

/// Daily free counter row, unique per (user, day)
#[derive(Debug, Clone, FromRow)]
pub struct DailyFreeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub day: NaiveDate,
    pub used_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Token balance row, one per user
#[derive(Debug, Clone, FromRow)]
pub struct TokenBalanceRow {
    pub user_id: Uuid,
    pub tokens: i64,
    pub total_consumed: i64,
    pub updated_at: DateTime<Utc>,
}

// Conversion helpers from row types to giftlink-types domain types
impl PermanentGrantRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> giftlink_types::UserId {
        giftlink_types::UserId(self.user_id)
    }
}

impl TimedGrantRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> giftlink_types::UserId {
        giftlink_types::UserId(self.user_id)
    }
}

impl TokenBalanceRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> giftlink_types::UserId {
        giftlink_types::UserId(self.user_id)
    }
}
