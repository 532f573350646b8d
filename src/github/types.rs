//! Request and response payloads of the GitHub git data and contents APIs.

use serde::{Deserialize, Serialize};

/// File mode for a regular, non-executable blob
pub const BLOB_MODE: &str = "100644";

#[derive(Debug, Clone, Deserialize)]
pub struct GitObject {
    pub sha: String,
}

/// `GET /repos/{owner}/{repo}/git/ref/heads/{branch}`
#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    pub object: GitObject,
}

/// `GET /repos/{owner}/{repo}/git/commits/{sha}`
#[derive(Debug, Clone, Deserialize)]
pub struct GitCommit {
    pub sha: String,
    pub tree: GitObject,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTreeEntry<'a> {
    pub path: &'a str,
    pub mode: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTree<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_tree: Option<&'a str>,
    pub tree: Vec<NewTreeEntry<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCommit<'a> {
    pub message: &'a str,
    pub tree: &'a str,
    pub parents: Vec<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateRef<'a> {
    pub sha: &'a str,
    pub force: bool,
}

/// `PUT /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, Serialize)]
pub struct PutContents<'a> {
    pub message: &'a str,
    /// Base64-encoded file content
    pub content: String,
    pub branch: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PutContentsResponse {
    pub commit: GitObject,
}

/// `GET /repos/{owner}/{repo}/git/trees/{sha}?recursive=1`
#[derive(Debug, Clone, Deserialize)]
pub struct GitTree {
    #[serde(default)]
    pub tree: Vec<GitTreeItem>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitTreeItem {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Token endpoint response; GitHub answers 200 for both outcomes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TokenResponse {
    Success {
        access_token: String,
        #[serde(default)]
        token_type: Option<String>,
        #[serde(default)]
        scope: Option<String>,
    },
    Error {
        error: String,
        #[serde(default)]
        error_description: Option<String>,
    },
}
