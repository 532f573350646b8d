//! Repository Publisher - Main orchestrator for publishing generated projects
//!
//! Manages the complete publishing workflow:
//! - Credential and identity resolution
//! - Repository name validation
//! - Repository creation and single-commit upload
//! - One-click deployment link
//! - Authentication state passthroughs and the popup handshake

use crate::core::config::PublisherConfig;
use crate::core::error::PublishError;
use crate::core::traits::{
    AuthenticatedUser, CreateRepositoryRequest, FileEntry, GeneratedFiles, OAuthProvider,
    PublishOptions, PublishResult, RepositoryApi, RepositoryDescriptor,
};
use crate::github::{GitHubApiClient, GitHubOAuth};
use crate::oauth::{AuthError, AuthHandshake, PopupLauncher};
use crate::validation::validate_repository_name;
use reqwest::Url;
use secrecy::SecretString;
use std::sync::Arc;
use uuid::Uuid;

/// Main repository publisher orchestrator
pub struct RepositoryPublisher {
    pub(super) oauth: Arc<dyn OAuthProvider>,
    pub(super) api: Arc<dyn RepositoryApi>,
    pub(super) config: PublisherConfig,
    launcher: Option<Arc<dyn PopupLauncher>>,
}

/// Successful pipeline output before it is wrapped into a [`PublishResult`]
#[derive(Debug, Clone)]
pub struct Published {
    pub repository: RepositoryDescriptor,
    pub deployment_url: Option<String>,
}

impl RepositoryPublisher {
    pub fn new(oauth: Arc<dyn OAuthProvider>, api: Arc<dyn RepositoryApi>) -> Self {
        Self {
            oauth,
            api,
            config: PublisherConfig::default(),
            launcher: None,
        }
    }

    /// Wire the GitHub implementations from resolved configuration
    pub fn github(config: PublisherConfig) -> Result<Self, PublishError> {
        let oauth = GitHubOAuth::from_config(&config)
            .map_err(|e| PublishError::Config(e.to_string()))?;
        let api = GitHubApiClient::new(config.api_url())
            .map_err(|e| PublishError::Config(e.to_string()))?;

        Ok(Self::new(Arc::new(oauth), Arc::new(api)).with_config(config))
    }

    pub fn with_config(mut self, config: PublisherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_popup_launcher(mut self, launcher: Arc<dyn PopupLauncher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// Publish generated files to a new repository
    ///
    /// Never fails: every error is captured in [`PublishResult::Failed`]
    /// with a human-readable message.
    pub async fn publish(&self, files: &GeneratedFiles, options: &PublishOptions) -> PublishResult {
        match self.try_publish(files, options).await {
            Ok(published) => PublishResult::Published {
                repository: published.repository,
                deployment_url: published.deployment_url,
            },
            Err(error) => {
                tracing::warn!(code = error.code(), error = %error, "publish failed");
                PublishResult::Failed {
                    error: error.user_message(),
                }
            }
        }
    }

    /// Same pipeline as [`publish`](Self::publish), keeping the typed error
    ///
    /// Callers that want [`PublishError::suggested_actions`] or the error
    /// code use this instead.
    pub async fn try_publish(
        &self,
        files: &GeneratedFiles,
        options: &PublishOptions,
    ) -> Result<Published, PublishError> {
        // 1. Credential
        let token = self
            .oauth
            .access_token()
            .ok_or(PublishError::NotAuthenticated)?;

        let validation = validate_repository_name(&options.name);
        if let Some(reason) = validation.error {
            return Err(PublishError::InvalidName { reason });
        }

        // 2. Identity
        let user = self.resolve_user(&token).await?;
        tracing::debug!(login = %user.login, "resolved GitHub user");

        // 3. Repository
        let request = CreateRepositoryRequest {
            name: options.name.clone(),
            description: options.description.clone(),
            private: options.private,
            auto_init: options.include_readme,
        };
        let repository = self
            .oauth
            .create_repository(&token, &request)
            .await
            .map_err(PublishError::remote)?;
        tracing::info!(repository = %repository.html_url, "created repository");

        // 4. Files
        let entries = FileEntry::from_generated(files);
        if entries.is_empty() {
            return Err(PublishError::EmptyPayload);
        }

        // 5. Upload
        let branch = repository
            .default_branch
            .as_deref()
            .unwrap_or(self.config.default_branch());
        self.oauth
            .upload_files(
                &token,
                &user.login,
                &repository.name,
                branch,
                &entries,
                self.config.commit_message(),
            )
            .await
            .map_err(PublishError::remote)?;
        tracing::info!(files = entries.len(), "uploaded initial commit");

        // 6. Deployment link
        let deployment_url = if options.auto_deploy {
            self.deployment_url(&repository.clone_url)
        } else {
            None
        };

        Ok(Published {
            repository: RepositoryDescriptor::from(&repository),
            deployment_url,
        })
    }

    /// Resolve the token's user, forgetting the token when it is rejected
    async fn resolve_user(&self, token: &SecretString) -> Result<AuthenticatedUser, PublishError> {
        match self.oauth.fetch_user(token).await {
            Ok(user) => Ok(user),
            Err(e) => {
                tracing::warn!(error = %e, "user lookup failed, clearing stored credential");
                self.oauth.clear_token();
                Err(PublishError::InvalidCredential)
            }
        }
    }

    /// One-click deployment URL carrying the clone URL as a query parameter
    pub fn deployment_url(&self, clone_url: &str) -> Option<String> {
        let template = self.config.deploy_template();
        match Url::parse_with_params(template, [(self.config.deploy_query_param(), clone_url)]) {
            Ok(url) => Some(url.into()),
            Err(e) => {
                tracing::warn!(template, error = %e, "invalid deployment template");
                None
            }
        }
    }

    // ------------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------------

    pub fn is_authenticated(&self) -> bool {
        self.oauth.access_token().is_some()
    }

    pub fn get_access_token(&self) -> Option<SecretString> {
        self.oauth.access_token()
    }

    /// Open the authorization popup and wait for it to settle
    pub async fn initiate_auth(&self) -> Result<(), AuthError> {
        let launcher = self
            .launcher
            .as_ref()
            .ok_or_else(|| AuthError::Launch("no popup launcher configured".to_string()))?;

        let state = Uuid::new_v4().to_string();
        self.oauth.store_state(&state);
        let url = self.oauth.authorization_url(&state);
        tracing::debug!("opening authorization window");

        let session = launcher.launch(&url).await?;
        AuthHandshake::from_config(&self.config).wait(session).await
    }

    /// Finish the flow from the OAuth callback
    ///
    /// The stored state is consumed whether or not it matches.
    pub async fn complete_auth(&self, code: &str, state: &str) -> Result<(), AuthError> {
        match self.oauth.take_state() {
            Some(expected) if expected == state => {}
            _ => return Err(AuthError::StateMismatch),
        }

        let token = self
            .oauth
            .exchange_code(code)
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;
        self.oauth.store_token(token);
        Ok(())
    }

    pub fn disconnect(&self) {
        self.oauth.clear_token();
        tracing::info!("disconnected from GitHub");
    }

    /// Current user; a failed lookup clears the stored credential
    pub async fn get_user(&self) -> Option<AuthenticatedUser> {
        let token = self.oauth.access_token()?;
        self.resolve_user(&token).await.ok()
    }
}
