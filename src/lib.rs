pub mod core;
pub mod github;
pub mod oauth;
pub mod orchestration;
pub mod security;
pub mod validation;

pub use crate::core::*;
pub use github::{ApiError, GitHubApiClient, GitHubOAuth};
pub use oauth::{AuthError, AuthHandshake, AuthMessage, AuthWindow, PopupLauncher, PopupSession};
pub use orchestration::{Published, RepositoryPublisher};
pub use security::SecureTokenManager;
pub use validation::{NameValidation, sanitize_repository_name, validate_repository_name};
