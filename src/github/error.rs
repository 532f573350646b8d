//! GitHub API error types.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the GitHub REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status; `message` is GitHub's own text when it sent one.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("OAuth error: {0}")]
    OAuth(String),
}

/// Error body returned by GitHub on 4xx/5xx
#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<GitHubErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorDetail {
    message: Option<String>,
}

impl ApiError {
    /// Build a status error from a response body.
    ///
    /// Prefers the first detailed validation message (e.g. "name already
    /// exists on this account"), then the top-level message, then a generic
    /// description of the status.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<GitHubErrorBody>(body).ok();

        let detail = parsed
            .as_ref()
            .and_then(|b| b.errors.iter().find_map(|e| e.message.clone()));
        let top_level = parsed.and_then(|b| b.message);

        let message = detail
            .or(top_level)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("GitHub API returned status {}", status));

        Self::Status { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
