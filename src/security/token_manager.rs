//! Secure token manager with memory-safe handling and masking capabilities
//!
//! This module keeps the GitHub access token and the pending OAuth CSRF state,
//! using the `secrecy` crate to prevent accidental token exposure in logs or
//! memory dumps.

use secrecy::SecretString;
use std::sync::RwLock;

/// In-memory store for the access token and the OAuth state parameter
///
/// All methods take `&self` so the manager can be shared behind an `Arc`.
///
/// # Examples
///
/// ```
/// use repo_publisher::security::SecureTokenManager;
/// use secrecy::{ExposeSecret, SecretString};
///
/// let manager = SecureTokenManager::new();
/// manager.set_token(SecretString::from("gho_abcdef123456"));
/// let token = manager.get_token().unwrap();
/// assert_eq!(manager.mask_token(token.expose_secret()), "gho...456");
/// ```
#[derive(Default)]
pub struct SecureTokenManager {
    token: RwLock<Option<SecretString>>,
    oauth_state: RwLock<Option<String>>,
}

impl SecureTokenManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves the stored token, `None` if absent or poisoned
    pub fn get_token(&self) -> Option<SecretString> {
        self.token.read().ok()?.clone()
    }

    pub fn set_token(&self, token: SecretString) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token);
        }
    }

    /// Forget the stored token
    pub fn clear_token(&self) {
        if let Ok(mut slot) = self.token.write() {
            if slot.is_some() {
                tracing::debug!("clearing stored access token");
            }
            *slot = None;
        }
    }

    /// Remember the state sent with an authorization request
    pub fn set_state(&self, state: &str) {
        if let Ok(mut slot) = self.oauth_state.write() {
            *slot = Some(state.to_string());
        }
    }

    /// Return and forget the pending state; it is single-use
    pub fn take_state(&self) -> Option<String> {
        self.oauth_state.write().ok()?.take()
    }

    /// Masks a token for safe logging
    ///
    /// Shows only the first 3 and last 3 characters for identification purposes.
    /// Tokens shorter than 10 characters are fully masked as "****".
    ///
    /// # Examples
    ///
    /// ```
    /// use repo_publisher::security::SecureTokenManager;
    ///
    /// let manager = SecureTokenManager::new();
    /// assert_eq!(manager.mask_token("abcdef123456"), "abc...456");
    /// assert_eq!(manager.mask_token("short"), "****");
    /// ```
    pub fn mask_token(&self, token: &str) -> String {
        let chars: Vec<char> = token.chars().collect();
        if chars.len() < 10 {
            return "****".to_string();
        }

        let prefix: String = chars[..3].iter().collect();
        let suffix: String = chars[chars.len() - 3..].iter().collect();
        format!("{}...{}", prefix, suffix)
    }
}
