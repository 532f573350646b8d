//! Configuration file loader for repo-publisher
//!
//! This module provides configuration loading, validation, and merging capabilities.

use super::config::*;
use crate::core::error::PublishError;
use lazy_static::lazy_static;
use reqwest::Url;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Configuration file name
pub const CONFIG_FILENAME: &str = ".repo-publisher.yaml";

lazy_static! {
    /// Environment variable pattern (${VAR_NAME})
    static ref ENV_VAR_REGEX: Regex = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
}

/// Configuration load options
#[derive(Debug, Clone, Default)]
pub struct ConfigLoadOptions {
    /// Project path to load config from
    pub project_path: PathBuf,

    /// Directory holding the global config (usually $HOME)
    pub home_dir: Option<PathBuf>,

    /// CLI arguments (highest priority)
    pub cli_args: Option<PublisherConfig>,

    /// Environment variables
    pub env: HashMap<String, String>,
}

impl ConfigLoadOptions {
    /// Options reading the real process environment
    pub fn from_env(project_path: impl Into<PathBuf>) -> Self {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self {
            project_path: project_path.into(),
            home_dir: env.get("HOME").map(PathBuf::from),
            cli_args: None,
            env,
        }
    }
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Field path (e.g., "github.apiUrl")
    pub field: String,

    pub message: String,
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from multiple sources with priority
    ///
    /// Priority (high to low):
    /// 1. CLI arguments
    /// 2. Environment variables
    /// 3. Project config (./.repo-publisher.yaml)
    /// 4. Global config (~/.repo-publisher.yaml)
    /// 5. Default values
    pub async fn load(options: ConfigLoadOptions) -> Result<PublisherConfig, PublishError> {
        let mut configs: Vec<PublisherConfig> = vec![PublisherConfig::default()];

        if let Some(home_dir) = &options.home_dir
            && let Some(global_config) =
                Self::load_config_file(&home_dir.join(CONFIG_FILENAME)).await?
        {
            configs.push(global_config);
        }

        if let Some(project_config) =
            Self::load_config_file(&options.project_path.join(CONFIG_FILENAME)).await?
        {
            configs.push(project_config);
        }

        if let Some(env_config) = Self::load_env_config(&options.env) {
            configs.push(env_config);
        }

        if let Some(cli_config) = options.cli_args {
            configs.push(cli_config);
        }

        let merged = Self::merge_configs(configs);
        let expanded = Self::expand_env_vars(merged, &options.env);

        let errors = Self::validate(&expanded);
        if let Some(first) = errors.first() {
            return Err(PublishError::Config(format!(
                "{}: {}",
                first.field, first.message
            )));
        }

        Ok(expanded)
    }

    /// Load configuration from a YAML file, `Ok(None)` if it does not exist
    async fn load_config_file(file_path: &Path) -> Result<Option<PublisherConfig>, PublishError> {
        if !file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(file_path)
            .await
            .map_err(|e| PublishError::Config(format!("Failed to read config file: {}", e)))?;

        let config: PublisherConfig = serde_yaml::from_str(&content)
            .map_err(|e| PublishError::Config(format!("Failed to parse YAML config: {}", e)))?;

        tracing::debug!(path = %file_path.display(), "loaded config file");
        Ok(Some(config))
    }

    /// Load configuration from environment variables
    fn load_env_config(env: &HashMap<String, String>) -> Option<PublisherConfig> {
        let github = GitHubConfig {
            api_url: env.get("GITHUB_API_URL").cloned(),
            client_id: env.get("GITHUB_CLIENT_ID").cloned(),
            client_secret: env.get("GITHUB_CLIENT_SECRET").cloned(),
            redirect_uri: env.get("GITHUB_REDIRECT_URI").cloned(),
            token: env.get("GITHUB_TOKEN").cloned(),
            ..Default::default()
        };

        if github == GitHubConfig::default() {
            None
        } else {
            Some(PublisherConfig {
                github: Some(github),
                ..Default::default()
            })
        }
    }

    /// Merge multiple configurations with priority (later wins)
    fn merge_configs(configs: Vec<PublisherConfig>) -> PublisherConfig {
        let mut result = PublisherConfig::default();

        for config in configs {
            Self::merge_into(&mut result, config);
        }

        result
    }

    /// Merge source config into target, field by field
    fn merge_into(target: &mut PublisherConfig, source: PublisherConfig) {
        if let Some(source_github) = source.github {
            let github = target.github.get_or_insert_with(Default::default);
            overlay(&mut github.api_url, source_github.api_url);
            overlay(&mut github.authorize_url, source_github.authorize_url);
            overlay(&mut github.token_url, source_github.token_url);
            overlay(&mut github.client_id, source_github.client_id);
            overlay(&mut github.client_secret, source_github.client_secret);
            overlay(&mut github.redirect_uri, source_github.redirect_uri);
            overlay(&mut github.scope, source_github.scope);
            overlay(&mut github.token, source_github.token);
        }

        if let Some(source_publish) = source.publish {
            let publish = target.publish.get_or_insert_with(Default::default);
            overlay(&mut publish.commit_message, source_publish.commit_message);
            overlay(&mut publish.default_branch, source_publish.default_branch);
            overlay(&mut publish.max_name_attempts, source_publish.max_name_attempts);
            overlay(&mut publish.recent_page_size, source_publish.recent_page_size);
        }

        if let Some(source_deploy) = source.deploy {
            let deploy = target.deploy.get_or_insert_with(Default::default);
            overlay(&mut deploy.template_url, source_deploy.template_url);
            overlay(&mut deploy.query_param, source_deploy.query_param);
        }

        if let Some(source_auth) = source.auth {
            let auth = target.auth.get_or_insert_with(Default::default);
            overlay(&mut auth.poll_interval_ms, source_auth.poll_interval_ms);
            overlay(&mut auth.message_origin, source_auth.message_origin);
        }
    }

    /// Expand `${VAR}` references in the string values that commonly hold secrets
    fn expand_env_vars(mut config: PublisherConfig, env: &HashMap<String, String>) -> PublisherConfig {
        if let Some(github) = &mut config.github {
            for value in [
                &mut github.client_id,
                &mut github.client_secret,
                &mut github.redirect_uri,
                &mut github.token,
                &mut github.api_url,
            ]
            .into_iter()
            .flatten()
            {
                *value = Self::expand_string(value, env);
            }
        }

        config
    }

    /// Expand environment variables in a single string
    ///
    /// Unknown variables are left in place.
    fn expand_string(input: &str, env: &HashMap<String, String>) -> String {
        ENV_VAR_REGEX
            .replace_all(input, |caps: &regex::Captures| match env.get(&caps[1]) {
                Some(value) => value.clone(),
                None => {
                    tracing::warn!(variable = &caps[1], "environment variable not found");
                    caps[0].to_string()
                }
            })
            .into_owned()
    }

    /// Validate configuration
    pub fn validate(config: &PublisherConfig) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("github.apiUrl", config.api_url()),
            ("github.authorizeUrl", config.authorize_url()),
            ("github.tokenUrl", config.token_url()),
            ("deploy.templateUrl", config.deploy_template()),
        ] {
            if let Err(e) = Url::parse(value) {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: format!("invalid URL {:?}: {}", value, e),
                });
            }
        }

        if config.max_name_attempts() == 0 {
            errors.push(ConfigValidationError {
                field: "publish.maxNameAttempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if config.recent_page_size() == 0 || config.recent_page_size() > 100 {
            errors.push(ConfigValidationError {
                field: "publish.recentPageSize".to_string(),
                message: "must be between 1 and 100".to_string(),
            });
        }

        if config.auth_poll_interval().is_zero() {
            errors.push(ConfigValidationError {
                field: "auth.pollIntervalMs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        errors
    }
}

fn overlay<T>(target: &mut Option<T>, source: Option<T>) {
    if source.is_some() {
        *target = source;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_env_config() {
        let mut env = HashMap::new();
        env.insert("GITHUB_CLIENT_ID".to_string(), "client-1".to_string());
        env.insert("GITHUB_TOKEN".to_string(), "gho_token".to_string());

        let config = ConfigLoader::load_env_config(&env).unwrap();
        let github = config.github.unwrap();

        assert_eq!(github.client_id.as_deref(), Some("client-1"));
        assert_eq!(github.token.as_deref(), Some("gho_token"));
        assert!(github.client_secret.is_none());
    }

    #[test]
    fn test_load_env_config_none_when_unset() {
        let env = HashMap::new();
        assert!(ConfigLoader::load_env_config(&env).is_none());
    }

    #[test]
    fn test_expand_string() {
        let mut env = HashMap::new();
        env.insert("GITHUB_CLIENT_SECRET".to_string(), "secret123".to_string());

        let result = ConfigLoader::expand_string("${GITHUB_CLIENT_SECRET}", &env);
        assert_eq!(result, "secret123");

        let untouched = ConfigLoader::expand_string("${MISSING_VAR}-x", &env);
        assert_eq!(untouched, "${MISSING_VAR}-x");
    }

    #[test]
    fn test_merge_configs_field_by_field() {
        let base = PublisherConfig {
            github: Some(GitHubConfig {
                client_id: Some("base-id".to_string()),
                scope: Some("repo".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let override_config = PublisherConfig {
            github: Some(GitHubConfig {
                client_id: Some("override-id".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = ConfigLoader::merge_configs(vec![base, override_config]);
        let github = merged.github.unwrap();

        assert_eq!(github.client_id.as_deref(), Some("override-id"));
        assert_eq!(github.scope.as_deref(), Some("repo"));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let config = PublisherConfig {
            publish: Some(PublishSettings {
                max_name_attempts: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };

        let errors = ConfigLoader::validate(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "publish.maxNameAttempts");
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = PublisherConfig {
            github: Some(GitHubConfig {
                api_url: Some("not a url".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let errors = ConfigLoader::validate(&config);
        assert!(errors.iter().any(|e| e.field == "github.apiUrl"));
    }

    #[tokio::test]
    async fn test_load_precedence() {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();

        std::fs::write(
            home.path().join(CONFIG_FILENAME),
            "github:\n  clientId: global-id\n  scope: repo\npublish:\n  maxNameAttempts: 7\n",
        )
        .unwrap();
        std::fs::write(
            project.path().join(CONFIG_FILENAME),
            "github:\n  clientId: project-id\n  clientSecret: ${GITHUB_CLIENT_SECRET}\n",
        )
        .unwrap();

        let mut env = HashMap::new();
        env.insert("GITHUB_CLIENT_SECRET".to_string(), "from-env".to_string());
        env.insert("GITHUB_TOKEN".to_string(), "env-token".to_string());

        let config = ConfigLoader::load(ConfigLoadOptions {
            project_path: project.path().to_path_buf(),
            home_dir: Some(home.path().to_path_buf()),
            cli_args: None,
            env,
        })
        .await
        .unwrap();

        let github = config.github.as_ref().unwrap();
        assert_eq!(github.client_id.as_deref(), Some("project-id"));
        assert_eq!(github.client_secret.as_deref(), Some("from-env"));
        assert_eq!(github.scope.as_deref(), Some("repo"));
        assert_eq!(github.token.as_deref(), Some("env-token"));
        assert_eq!(config.max_name_attempts(), 7);
    }

    #[tokio::test]
    async fn test_load_reports_invalid_yaml() {
        let project = TempDir::new().unwrap();
        std::fs::write(project.path().join(CONFIG_FILENAME), "github: [unclosed").unwrap();

        let result = ConfigLoader::load(ConfigLoadOptions {
            project_path: project.path().to_path_buf(),
            ..Default::default()
        })
        .await;

        assert!(matches!(result, Err(PublishError::Config(_))));
    }
}
