//! Entitlement status types

use serde::{Deserialize, Serialize};

/// Where unlimited access comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnlimitedSource {
    /// Lifetime grant
    Permanent,
    /// Active timed window
    Timed,
}

/// Where a metered generation would be drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeteredSource {
    /// Daily free allowance
    Free,
    /// Prepaid token balance
    Tokens,
}

/// Outcome of a read-side entitlement evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EntitlementStatus {
    /// Generations are unlimited for this user right now
    Unlimited {
        source: UnlimitedSource,
        /// Seconds left in the window; absent for permanent grants
        #[serde(skip_serializing_if = "Option::is_none")]
        remaining_seconds: Option<i64>,
    },
    /// A bounded number of generations remain
    Metered {
        source: MeteredSource,
        remaining: i64,
    },
    /// No entitlement available
    Denied,
}

impl EntitlementStatus {
    /// True unless the status is `Denied`
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::Denied)
    }
}
