//! GitHub implementation of the OAuth/API collaborator.
//!
//! Combines the OAuth web application flow (authorization URL, code
//! exchange) with the in-memory [`SecureTokenManager`] and the write side of
//! [`GitHubApiClient`].

use super::client::GitHubApiClient;
use super::error::ApiError;
use super::types::TokenResponse;
use crate::core::config::PublisherConfig;
use crate::core::traits::{
    AuthenticatedUser, CreateRepositoryRequest, FileEntry, OAuthProvider, RemoteRepository,
};
use crate::security::SecureTokenManager;
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};

/// OAuth application registration
#[derive(Debug, Clone)]
pub struct OAuthApp {
    pub client_id: String,
    pub client_secret: Option<SecretString>,
    pub redirect_uri: Option<String>,
    pub scope: String,
}

/// GitHub-backed [`OAuthProvider`]
pub struct GitHubOAuth {
    client: GitHubApiClient,
    tokens: SecureTokenManager,
    app: OAuthApp,
    authorize_url: Url,
    token_url: Url,
}

impl GitHubOAuth {
    pub fn new(
        client: GitHubApiClient,
        app: OAuthApp,
        authorize_url: &str,
        token_url: &str,
    ) -> Result<Self, ApiError> {
        let parse = |url: &str| {
            Url::parse(url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", url, e)))
        };

        Ok(Self {
            client,
            tokens: SecureTokenManager::new(),
            app,
            authorize_url: parse(authorize_url)?,
            token_url: parse(token_url)?,
        })
    }

    /// Build a provider from resolved configuration.
    ///
    /// A pre-issued `github.token` is stored right away so callers can skip
    /// the interactive flow.
    pub fn from_config(config: &PublisherConfig) -> Result<Self, ApiError> {
        let github = config.github.clone().unwrap_or_default();
        let app = OAuthApp {
            client_id: github.client_id.unwrap_or_default(),
            client_secret: github.client_secret.map(SecretString::from),
            redirect_uri: github.redirect_uri,
            scope: config.scope().to_string(),
        };

        let provider = Self::new(
            GitHubApiClient::new(config.api_url())?,
            app,
            config.authorize_url(),
            config.token_url(),
        )?;

        if let Some(token) = github.token.filter(|t| !t.is_empty()) {
            provider.tokens.set_token(SecretString::from(token));
        }

        Ok(provider)
    }
}

#[async_trait]
impl OAuthProvider for GitHubOAuth {
    fn authorization_url(&self, state: &str) -> String {
        let mut url = self.authorize_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &self.app.client_id);
            if let Some(redirect_uri) = &self.app.redirect_uri {
                query.append_pair("redirect_uri", redirect_uri);
            }
            query.append_pair("scope", &self.app.scope);
            query.append_pair("state", state);
        }
        url.into()
    }

    fn store_state(&self, state: &str) {
        self.tokens.set_state(state);
    }

    fn take_state(&self) -> Option<String> {
        self.tokens.take_state()
    }

    async fn exchange_code(&self, code: &str) -> anyhow::Result<SecretString> {
        if self.app.client_id.is_empty() {
            return Err(
                ApiError::OAuth("GitHub OAuth client id is not configured".to_string()).into(),
            );
        }

        let mut form = vec![
            ("client_id", self.app.client_id.clone()),
            ("code", code.to_string()),
        ];
        if let Some(secret) = &self.app.client_secret {
            form.push(("client_secret", secret.expose_secret().to_string()));
        }
        if let Some(redirect_uri) = &self.app.redirect_uri {
            form.push(("redirect_uri", redirect_uri.clone()));
        }

        let response = self
            .client
            .http()
            .post(self.token_url.clone())
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::from)?;
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body).into());
        }

        match serde_json::from_str::<TokenResponse>(&body)
            .map_err(|e| ApiError::Parse(e.to_string()))?
        {
            TokenResponse::Success { access_token, .. } => {
                tracing::info!(
                    token = %self.tokens.mask_token(&access_token),
                    "exchanged authorization code"
                );
                Ok(SecretString::from(access_token))
            }
            TokenResponse::Error {
                error,
                error_description,
            } => Err(ApiError::OAuth(error_description.unwrap_or(error)).into()),
        }
    }

    fn store_token(&self, token: SecretString) {
        self.tokens.set_token(token);
    }

    fn access_token(&self) -> Option<SecretString> {
        self.tokens.get_token()
    }

    fn clear_token(&self) {
        self.tokens.clear_token();
    }

    async fn fetch_user(&self, token: &SecretString) -> anyhow::Result<AuthenticatedUser> {
        Ok(self.client.get_authenticated_user(token).await?)
    }

    async fn create_repository(
        &self,
        token: &SecretString,
        request: &CreateRepositoryRequest,
    ) -> anyhow::Result<RemoteRepository> {
        Ok(self.client.create_repository(token, request).await?)
    }

    async fn upload_files(
        &self,
        token: &SecretString,
        owner: &str,
        repo: &str,
        branch: &str,
        files: &[FileEntry],
        message: &str,
    ) -> anyhow::Result<()> {
        self.client
            .upload_files(token, owner, repo, branch, files, message)
            .await?;
        Ok(())
    }
}
