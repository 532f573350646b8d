//! Error handling for repository publishing
//!
//! This module provides the error taxonomy of the publish workflow with
//! recovery guidance, using the thiserror crate for ergonomic error handling.

use thiserror::Error;

/// Message used when a failure carries no usable text
pub const GENERIC_PUBLISH_FAILURE: &str = "Failed to publish to GitHub";

/// Main error type for repository publishing operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    // Authentication errors
    #[error("Not authenticated with GitHub")]
    NotAuthenticated,

    #[error("Failed to get user information")]
    InvalidCredential,

    // Validation errors
    #[error("{reason}")]
    InvalidName { reason: String },

    #[error("No files to upload")]
    EmptyPayload,

    // Remote errors (message is propagated verbatim)
    #[error("{message}")]
    RemoteOperation { message: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PublishError {
    /// Wrap any displayable remote failure, keeping its message verbatim
    pub fn remote(error: impl std::fmt::Display) -> Self {
        Self::RemoteOperation {
            message: error.to_string(),
        }
    }

    /// Human-readable message, falling back to a generic one when empty
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_PUBLISH_FAILURE.to_string()
        } else {
            message
        }
    }

    /// Check if retrying the same request can succeed without user action
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RemoteOperation { .. })
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::NotAuthenticated => vec!["Connect your GitHub account and try again"],
            Self::InvalidCredential => vec![
                "Your GitHub session has expired or was revoked",
                "Reconnect your GitHub account",
            ],
            Self::InvalidName { .. } => vec![
                "Use only letters, numbers, periods, hyphens, and underscores",
                "Avoid reserved names such as con, prn, aux, nul",
            ],
            Self::EmptyPayload => vec!["Generate the project files before publishing"],
            Self::RemoteOperation { .. } => vec![
                "Check that the repository name is not already taken",
                "Check your network connection",
                "Check GitHub status and try again",
            ],
            Self::Config(_) => vec!["Check .repo-publisher.yaml and related environment variables"],
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::InvalidName { .. } => "INVALID_NAME",
            Self::EmptyPayload => "EMPTY_PAYLOAD",
            Self::RemoteOperation { .. } => "REMOTE_OPERATION_FAILED",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }
}
