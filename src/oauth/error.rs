//! Authorization handshake errors.

use thiserror::Error;

/// Errors surfaced by the interactive authorization flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The popup was closed before it reported an outcome.
    #[error("Authentication cancelled")]
    Cancelled,

    /// The popup reported an explicit failure.
    #[error("{0}")]
    Rejected(String),

    /// The callback state did not match the stored one (CSRF protection).
    #[error("Invalid state parameter. This may be a CSRF attack.")]
    StateMismatch,

    #[error("Failed to open authorization window: {0}")]
    Launch(String),

    #[error("Failed to exchange authorization code: {0}")]
    Exchange(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cancelled => "AUTH_CANCELLED",
            Self::Rejected(_) => "AUTH_REJECTED",
            Self::StateMismatch => "AUTH_STATE_MISMATCH",
            Self::Launch(_) => "AUTH_LAUNCH_FAILED",
            Self::Exchange(_) => "AUTH_EXCHANGE_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_keeps_message() {
        let error = AuthError::Rejected("access_denied".to_string());
        assert_eq!(error.to_string(), "access_denied");
        assert_eq!(error.code(), "AUTH_REJECTED");
    }

    #[test]
    fn test_cancelled() {
        assert_eq!(AuthError::Cancelled.code(), "AUTH_CANCELLED");
        assert_eq!(AuthError::Cancelled.to_string(), "Authentication cancelled");
    }
}
