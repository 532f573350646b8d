//! GitHub REST API and OAuth integration.

pub mod client;
pub mod error;
pub mod oauth;
pub mod types;

pub use client::GitHubApiClient;
pub use error::ApiError;
pub use oauth::{GitHubOAuth, OAuthApp};
