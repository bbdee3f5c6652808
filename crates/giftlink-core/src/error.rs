//! Core errors

use thiserror::Error;

/// Errors surfaced by the generation pipeline
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed or non-matching share link; nothing was consumed
    #[error("invalid share link: {0}")]
    InvalidShareLink(String),

    /// No tier available for this user; nothing was consumed
    #[error("no generation entitlement available")]
    EntitlementDenied,

    /// The external host did not yield a final URL within the retry budget
    #[error("share link did not resolve after {attempts} attempts")]
    ResolutionFailed { attempts: u32 },

    /// The resolved URL carries no product identifier
    #[error("resolved link carries no product id")]
    ProductIdNotFound,

    /// No pending handoff for the session
    #[error("no pending handoff for this session")]
    HandoffMissing,

    /// The pending handoff did not decode to a usable link
    #[error("handoff payload did not decode to a usable link")]
    HandoffInvalid,

    /// Ledger error; the consumption attempt was aborted
    #[error("ledger error: {0}")]
    Ledger(String),
}

impl CoreError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidShareLink(_) => 400,
            Self::EntitlementDenied => 402,
            Self::ResolutionFailed { .. } => 502,
            Self::ProductIdNotFound | Self::HandoffInvalid => 422,
            Self::HandoffMissing => 404,
            Self::Ledger(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidShareLink(_) => "INVALID_SHARE_LINK",
            Self::EntitlementDenied => "ENTITLEMENT_DENIED",
            Self::ResolutionFailed { .. } => "RESOLUTION_FAILED",
            Self::ProductIdNotFound => "PRODUCT_ID_NOT_FOUND",
            Self::HandoffMissing => "HANDOFF_MISSING",
            Self::HandoffInvalid => "HANDOFF_INVALID",
            Self::Ledger(_) => "LEDGER_ERROR",
        }
    }

    /// Transient failures the caller should retry; everything else routes to
    /// validation or the purchase flow.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ResolutionFailed { .. } | Self::Ledger(_))
    }
}

impl From<giftlink_db::DbError> for CoreError {
    fn from(err: giftlink_db::DbError) -> Self {
        tracing::error!("Ledger error: {}", err);
        Self::Ledger(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_split() {
        assert!(CoreError::ResolutionFailed { attempts: 3 }.is_retryable());
        assert!(CoreError::Ledger("down".into()).is_retryable());

        assert!(!CoreError::EntitlementDenied.is_retryable());
        assert!(!CoreError::InvalidShareLink("x".into()).is_retryable());
        assert!(!CoreError::ProductIdNotFound.is_retryable());
        assert!(!CoreError::HandoffMissing.is_retryable());
    }

    #[test]
    fn test_denied_and_transient_map_to_distinct_codes() {
        // Callers route 402 to the purchase flow and 5xx to a retry.
        assert_eq!(CoreError::EntitlementDenied.status_code(), 402);
        assert_eq!(CoreError::ResolutionFailed { attempts: 3 }.status_code(), 502);
        assert_ne!(
            CoreError::EntitlementDenied.error_code(),
            CoreError::ResolutionFailed { attempts: 3 }.error_code()
        );
    }
}
