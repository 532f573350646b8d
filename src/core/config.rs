//! Configuration structures and types for repo-publisher
//!
//! Every field is optional so that layered sources (defaults, global file,
//! project file, environment, CLI) can be merged field by field. Accessors
//! on [`PublisherConfig`] resolve the effective value.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const DEFAULT_SCOPE: &str = "repo user";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Initial commit: generated project files";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_MAX_NAME_ATTEMPTS: u32 = 100;
pub const DEFAULT_RECENT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_DEPLOY_TEMPLATE: &str = "https://vercel.com/new/clone";
pub const DEFAULT_DEPLOY_QUERY_PARAM: &str = "repository-url";
pub const DEFAULT_AUTH_POLL_INTERVAL_MS: u64 = 500;

/// Root configuration object
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PublisherConfig {
    /// GitHub endpoints and OAuth application (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<GitHubConfig>,

    /// Publish workflow settings (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<PublishSettings>,

    /// One-click deployment link (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deploy: Option<DeployConfig>,

    /// Authorization handshake (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

/// GitHub endpoints and OAuth application
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GitHubConfig {
    /// REST API base URL (default: https://api.github.com)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorize_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,

    /// OAuth application client id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// OAuth application client secret; prefer `${GITHUB_CLIENT_SECRET}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,

    /// Space-separated OAuth scopes (default: "repo user")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Pre-issued access token, used instead of the OAuth flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Publish workflow settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublishSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,

    /// Branch used when the created repository reports none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,

    /// Upper bound for unique-name suggestion (default: 100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_name_attempts: Option<u32>,

    /// Page size for the recent repository listing (default: 10)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_page_size: Option<u32>,
}

/// One-click deployment link
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeployConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_url: Option<String>,

    /// Query parameter receiving the clone URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_param: Option<String>,
}

/// Authorization handshake settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Window-closed polling interval in milliseconds (default: 500)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,

    /// Only messages from this origin settle the handshake
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_origin: Option<String>,
}

impl PublisherConfig {
    pub fn api_url(&self) -> &str {
        self.github
            .as_ref()
            .and_then(|g| g.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL)
    }

    pub fn authorize_url(&self) -> &str {
        self.github
            .as_ref()
            .and_then(|g| g.authorize_url.as_deref())
            .unwrap_or(DEFAULT_AUTHORIZE_URL)
    }

    pub fn token_url(&self) -> &str {
        self.github
            .as_ref()
            .and_then(|g| g.token_url.as_deref())
            .unwrap_or(DEFAULT_TOKEN_URL)
    }

    pub fn scope(&self) -> &str {
        self.github
            .as_ref()
            .and_then(|g| g.scope.as_deref())
            .unwrap_or(DEFAULT_SCOPE)
    }

    pub fn commit_message(&self) -> &str {
        self.publish
            .as_ref()
            .and_then(|p| p.commit_message.as_deref())
            .unwrap_or(DEFAULT_COMMIT_MESSAGE)
    }

    pub fn default_branch(&self) -> &str {
        self.publish
            .as_ref()
            .and_then(|p| p.default_branch.as_deref())
            .unwrap_or(DEFAULT_BRANCH)
    }

    pub fn max_name_attempts(&self) -> u32 {
        self.publish
            .as_ref()
            .and_then(|p| p.max_name_attempts)
            .unwrap_or(DEFAULT_MAX_NAME_ATTEMPTS)
    }

    pub fn recent_page_size(&self) -> u32 {
        self.publish
            .as_ref()
            .and_then(|p| p.recent_page_size)
            .unwrap_or(DEFAULT_RECENT_PAGE_SIZE)
    }

    pub fn deploy_template(&self) -> &str {
        self.deploy
            .as_ref()
            .and_then(|d| d.template_url.as_deref())
            .unwrap_or(DEFAULT_DEPLOY_TEMPLATE)
    }

    pub fn deploy_query_param(&self) -> &str {
        self.deploy
            .as_ref()
            .and_then(|d| d.query_param.as_deref())
            .unwrap_or(DEFAULT_DEPLOY_QUERY_PARAM)
    }

    pub fn auth_poll_interval(&self) -> Duration {
        let millis = self
            .auth
            .as_ref()
            .and_then(|a| a.poll_interval_ms)
            .unwrap_or(DEFAULT_AUTH_POLL_INTERVAL_MS);
        Duration::from_millis(millis)
    }

    pub fn message_origin(&self) -> Option<&str> {
        self.auth.as_ref().and_then(|a| a.message_origin.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = PublisherConfig::default();

        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(config.commit_message(), DEFAULT_COMMIT_MESSAGE);
        assert_eq!(config.max_name_attempts(), 100);
        assert_eq!(config.recent_page_size(), 10);
        assert_eq!(config.deploy_query_param(), "repository-url");
        assert_eq!(config.auth_poll_interval(), Duration::from_millis(500));
        assert!(config.message_origin().is_none());
    }

    #[test]
    fn test_yaml_camel_case_keys() {
        let yaml = r#"
github:
  apiUrl: https://ghe.example.com/api/v3
  clientId: abc123
publish:
  maxNameAttempts: 5
auth:
  pollIntervalMs: 250
  messageOrigin: https://app.example.com
"#;

        let config: PublisherConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.api_url(), "https://ghe.example.com/api/v3");
        assert_eq!(
            config.github.as_ref().unwrap().client_id.as_deref(),
            Some("abc123")
        );
        assert_eq!(config.max_name_attempts(), 5);
        assert_eq!(config.auth_poll_interval(), Duration::from_millis(250));
        assert_eq!(config.message_origin(), Some("https://app.example.com"));
    }

    #[test]
    fn test_serialization_skips_unset_sections() {
        let config = PublisherConfig {
            deploy: Some(DeployConfig {
                template_url: Some("https://app.netlify.com/start/deploy".to_string()),
                query_param: Some("repository".to_string()),
            }),
            ..Default::default()
        };

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("templateUrl"));
        assert!(!yaml.contains("github"));
    }
}
