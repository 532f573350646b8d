//! Advisory repository lookups
//!
//! Availability checks, unique-name suggestion, listing, and stats. None of
//! these report errors: every failure degrades to `false` or `None`.

use super::publisher::RepositoryPublisher;
use crate::core::traits::{RepositoryStats, RepositorySummary};
use secrecy::SecretString;

impl RepositoryPublisher {
    /// Token and login of the signed-in user, if both can be resolved
    async fn signed_in(&self) -> Option<(SecretString, String)> {
        let token = self.oauth.access_token()?;
        let user = self.get_user().await?;
        Some((token, user.login))
    }

    async fn is_available_for(&self, token: &SecretString, owner: &str, name: &str) -> bool {
        match self.api.get_repository(token, owner, name).await {
            Ok(None) => true,
            Ok(Some(_)) => false,
            Err(e) => {
                tracing::warn!(owner, name, error = %e, "availability lookup failed");
                false
            }
        }
    }

    /// Whether the signed-in user has no repository with this name
    ///
    /// Only a 404 from the API counts as available.
    pub async fn is_repository_name_available(&self, name: &str) -> bool {
        let Some((token, login)) = self.signed_in().await else {
            return false;
        };
        self.is_available_for(&token, &login, name).await
    }

    /// Suggest `base`, `base-1`, `base-2`, ... until one is available
    ///
    /// Gives up after the configured number of attempts and returns the last
    /// candidate, which may still be taken. Returns `base` unchanged when no
    /// user can be resolved.
    pub async fn generate_unique_repository_name(&self, base: &str) -> String {
        let Some((token, login)) = self.signed_in().await else {
            return base.to_string();
        };

        let attempts = self.config.max_name_attempts().max(1);
        let mut candidate = base.to_string();
        for attempt in 0..attempts {
            if attempt > 0 {
                candidate = format!("{}-{}", base, attempt);
            }
            if self.is_available_for(&token, &login, &candidate).await {
                return candidate;
            }
        }

        tracing::warn!(base, candidate = %candidate, attempts, "no available name found");
        candidate
    }

    /// Most recently updated repositories of the signed-in user
    pub async fn get_user_repositories(&self) -> Option<Vec<RepositorySummary>> {
        let token = self.oauth.access_token()?;

        match self
            .api
            .list_recent_repositories(&token, self.config.recent_page_size())
            .await
        {
            Ok(repos) => Some(repos.into_iter().map(RepositorySummary::from).collect()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to list repositories");
                None
            }
        }
    }

    /// Size, file count, and last update of one of the user's repositories
    pub async fn get_repository_stats(&self, repo: &str) -> Option<RepositoryStats> {
        let (token, login) = self.signed_in().await?;

        let repository = match self.api.get_repository(&token, &login, repo).await {
            Ok(Some(repository)) => repository,
            Ok(None) => {
                tracing::debug!(repo, "repository not found");
                return None;
            }
            Err(e) => {
                tracing::warn!(repo, error = %e, "failed to fetch repository");
                return None;
            }
        };

        let branch = repository
            .default_branch
            .as_deref()
            .unwrap_or(self.config.default_branch());
        let file_count = match self.api.count_files(&token, &login, repo, branch).await {
            Ok(count) => count,
            Err(e) => {
                tracing::debug!(repo, error = %e, "tree lookup failed, reporting zero files");
                0
            }
        };

        Some(RepositoryStats {
            size: repository.size,
            file_count,
            last_updated: repository.updated_at,
        })
    }
}
