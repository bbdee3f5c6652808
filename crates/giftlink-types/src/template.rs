//! Gift-link template selection

use serde::{Deserialize, Serialize};

/// Which outbound link template to compose
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Plain product gift link
    #[default]
    Standard,
    /// Full-return activity link with a time-derived nonce
    FullReturn,
}

impl TemplateKind {
    /// Stable string form used in API payloads and logs
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::FullReturn => "full_return",
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TemplateKind {
    type Err = TemplateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "full_return" => Ok(Self::FullReturn),
            _ => Err(TemplateParseError(s.to_string())),
        }
    }
}

/// Error parsing a template kind string
#[derive(Debug, Clone)]
pub struct TemplateParseError(pub String);

impl std::fmt::Display for TemplateParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid template kind: {}", self.0)
    }
}

impl std::error::Error for TemplateParseError {}
