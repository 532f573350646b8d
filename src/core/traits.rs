//! Core traits and types for repository publishing
//!
//! This module defines the value types exchanged by the publish workflow and
//! the two seams to the outside world: the OAuth/API collaborator and the
//! direct repository lookups.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generated project files keyed by path, iterated in path order
pub type GeneratedFiles = BTreeMap<String, String>;

// ============================================================================
// Publishing
// ============================================================================

/// Options describing the repository to create
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOptions {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    /// Initialize the repository with a README
    #[serde(default)]
    pub include_readme: bool,
    /// Derive a one-click deployment URL after upload
    #[serde(default)]
    pub auto_deploy: bool,
}

/// Minimal identity of a created or fetched repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryDescriptor {
    pub name: String,
    pub url: String,
    pub clone_url: String,
    pub html_url: String,
}

impl From<&RemoteRepository> for RepositoryDescriptor {
    fn from(repo: &RemoteRepository) -> Self {
        Self {
            name: repo.name.clone(),
            url: repo.html_url.clone(),
            clone_url: repo.clone_url.clone(),
            html_url: repo.html_url.clone(),
        }
    }
}

/// Outcome of a publish attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "PublishResultBody")]
pub enum PublishResult {
    Published {
        repository: RepositoryDescriptor,
        deployment_url: Option<String>,
    },
    Failed {
        error: String,
    },
}

impl PublishResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Published { .. })
    }

    pub fn repository(&self) -> Option<&RepositoryDescriptor> {
        match self {
            Self::Published { repository, .. } => Some(repository),
            Self::Failed { .. } => None,
        }
    }

    pub fn deployment_url(&self) -> Option<&str> {
        match self {
            Self::Published { deployment_url, .. } => deployment_url.as_deref(),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Published { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }
}

/// Flat wire shape of [`PublishResult`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishResultBody {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    repository: Option<RepositoryDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deployment_url: Option<String>,
}

impl From<PublishResult> for PublishResultBody {
    fn from(result: PublishResult) -> Self {
        match result {
            PublishResult::Published {
                repository,
                deployment_url,
            } => Self {
                success: true,
                repository: Some(repository),
                error: None,
                deployment_url,
            },
            PublishResult::Failed { error } => Self {
                success: false,
                repository: None,
                error: Some(error),
                deployment_url: None,
            },
        }
    }
}

/// One file of the initial commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
}

impl FileEntry {
    /// Flatten a generated-file mapping into commit entries, in path order
    pub fn from_generated(files: &GeneratedFiles) -> Vec<FileEntry> {
        files
            .iter()
            .map(|(path, content)| FileEntry {
                path: path.clone(),
                content: content.clone(),
            })
            .collect()
    }
}

// ============================================================================
// Remote entities
// ============================================================================

/// Signed-in GitHub account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub login: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Body of a repository creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRepositoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub private: bool,
    pub auto_init: bool,
}

/// Repository object as returned by the GitHub API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepository {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    pub clone_url: String,
    #[serde(default)]
    pub private: bool,
    /// Size in kilobytes
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Entry of the recent repository listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    pub name: String,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub html_url: String,
    pub clone_url: String,
    pub private: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<RemoteRepository> for RepositorySummary {
    fn from(repo: RemoteRepository) -> Self {
        Self {
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            html_url: repo.html_url,
            clone_url: repo.clone_url,
            private: repo.private,
            updated_at: repo.updated_at,
        }
    }
}

/// Size and activity metadata for a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStats {
    pub size: u64,
    pub file_count: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

// ============================================================================
// Collaborator traits
// ============================================================================

/// OAuth and repository-write capabilities of the hosting platform
///
/// Credential and state storage are synchronous; everything that talks to
/// the network is async.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Authorization URL carrying the given CSRF state
    fn authorization_url(&self, state: &str) -> String;

    fn store_state(&self, state: &str);

    /// Return and forget the stored CSRF state
    fn take_state(&self) -> Option<String>;

    /// Exchange an authorization code for an access token
    async fn exchange_code(&self, code: &str) -> anyhow::Result<SecretString>;

    fn store_token(&self, token: SecretString);

    fn access_token(&self) -> Option<SecretString>;

    fn clear_token(&self);

    async fn fetch_user(&self, token: &SecretString) -> anyhow::Result<AuthenticatedUser>;

    /// Create a repository owned by the token's user
    async fn create_repository(
        &self,
        token: &SecretString,
        request: &CreateRepositoryRequest,
    ) -> anyhow::Result<RemoteRepository>;

    /// Upload all files as a single commit on `branch`
    async fn upload_files(
        &self,
        token: &SecretString,
        owner: &str,
        repo: &str,
        branch: &str,
        files: &[FileEntry],
        message: &str,
    ) -> anyhow::Result<()>;
}

/// Read-only repository lookups made directly against the REST API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryApi: Send + Sync {
    /// Fetch a repository; `Ok(None)` means the API answered 404
    async fn get_repository(
        &self,
        token: &SecretString,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Option<RemoteRepository>>;

    /// Most recently updated repositories of the token's user
    async fn list_recent_repositories(
        &self,
        token: &SecretString,
        per_page: u32,
    ) -> anyhow::Result<Vec<RemoteRepository>>;

    /// Number of files on the given branch
    async fn count_files(
        &self,
        token: &SecretString,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> anyhow::Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_repository() -> RemoteRepository {
        RemoteRepository {
            name: "demo".to_string(),
            full_name: Some("octocat/demo".to_string()),
            description: None,
            html_url: "https://github.com/octocat/demo".to_string(),
            clone_url: "https://github.com/octocat/demo.git".to_string(),
            private: false,
            size: 0,
            default_branch: Some("main".to_string()),
            updated_at: None,
        }
    }

    #[test]
    fn test_descriptor_url_is_web_url() {
        let descriptor = RepositoryDescriptor::from(&sample_repository());

        assert_eq!(descriptor.url, "https://github.com/octocat/demo");
        assert_eq!(descriptor.url, descriptor.html_url);
        assert_eq!(descriptor.clone_url, "https://github.com/octocat/demo.git");
    }

    #[test]
    fn test_publish_result_success_accessors() {
        let result = PublishResult::Published {
            repository: RepositoryDescriptor::from(&sample_repository()),
            deployment_url: Some("https://deploy.example.com".to_string()),
        };

        assert!(result.is_success());
        assert_eq!(result.repository().unwrap().name, "demo");
        assert_eq!(result.deployment_url(), Some("https://deploy.example.com"));
        assert!(result.error().is_none());
    }

    #[test]
    fn test_publish_result_failure_serializes_flat() {
        let result = PublishResult::Failed {
            error: "No files to upload".to_string(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "No files to upload");
        assert!(json.get("repository").is_none());
        assert!(json.get("deploymentUrl").is_none());
    }

    #[test]
    fn test_publish_result_success_serializes_flat() {
        let result = PublishResult::Published {
            repository: RepositoryDescriptor::from(&sample_repository()),
            deployment_url: None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["repository"]["cloneUrl"], "https://github.com/octocat/demo.git");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_file_entries_follow_path_order() {
        let mut files = GeneratedFiles::new();
        files.insert("src/main.rs".to_string(), "fn main() {}".to_string());
        files.insert("README.md".to_string(), "# demo".to_string());

        let entries = FileEntry::from_generated(&files);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "README.md");
        assert_eq!(entries[1].content, "fn main() {}");
    }

    #[test]
    fn test_remote_repository_parses_github_payload() {
        let json = r#"{
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "html_url": "https://github.com/octocat/Hello-World",
            "clone_url": "https://github.com/octocat/Hello-World.git",
            "private": false,
            "size": 108,
            "default_branch": "master",
            "updated_at": "2011-01-26T19:14:43Z"
        }"#;

        let repo: RemoteRepository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.size, 108);
        assert_eq!(repo.default_branch.as_deref(), Some("master"));
        assert!(repo.updated_at.is_some());
    }

    #[test]
    fn test_create_request_omits_missing_description() {
        let request = CreateRepositoryRequest {
            name: "demo".to_string(),
            description: None,
            private: true,
            auto_init: false,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("description"));
        assert!(json.contains("\"private\":true"));
    }

    #[test]
    fn test_publish_options_defaults() {
        let options: PublishOptions = serde_json::from_str(r#"{"name":"demo"}"#).unwrap();

        assert_eq!(options.name, "demo");
        assert!(!options.private);
        assert!(!options.include_readme);
        assert!(!options.auto_deploy);
    }
}
