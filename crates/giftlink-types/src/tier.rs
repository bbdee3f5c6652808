//! Entitlement tier and grant-kind types

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// The category of entitlement consumed by a single generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Lifetime unlimited access purchased once
    Permanent,
    /// Unlimited access inside a purchased time window
    Timed,
    /// The daily free allowance
    Free,
    /// A prepaid token from the wallet balance
    Token,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permanent => write!(f, "permanent"),
            Self::Timed => write!(f, "timed"),
            Self::Free => write!(f, "free"),
            Self::Token => write!(f, "token"),
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "permanent" => Ok(Self::Permanent),
            "timed" => Ok(Self::Timed),
            "free" => Ok(Self::Free),
            "token" => Ok(Self::Token),
            _ => Err(TierParseError(s.to_string())),
        }
    }
}

/// Error parsing a tier string
#[derive(Debug, Clone)]
pub struct TierParseError(pub String);

impl std::fmt::Display for TierParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid tier: {}", self.0)
    }
}

impl std::error::Error for TierParseError {}

/// Duration class of a purchased timed grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimedKind {
    /// Five-minute window
    Short,
    /// Fifteen-minute window
    Long,
}

impl TimedKind {
    /// Window length for this kind
    pub fn duration(&self) -> Duration {
        match self {
            Self::Short => Duration::minutes(5),
            Self::Long => Duration::minutes(15),
        }
    }

    /// Stable string form used in storage
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
        }
    }
}

impl std::fmt::Display for TimedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TimedKind {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "long" => Ok(Self::Long),
            _ => Err(TierParseError(s.to_string())),
        }
    }
}
