//! Popup authorization handshake.
//!
//! After the authorization URL is opened in a popup, two things can end the
//! wait: the popup posts an [`AuthMessage`] back, or the user closes the
//! window. The handshake races a message receiver against a polling timer,
//! settles on whichever fires first, and then tears both down.
//!
//! # Example
//!
//! ```ignore
//! use repo_publisher::oauth::AuthHandshake;
//! use std::time::Duration;
//!
//! let session = launcher.launch(&authorization_url).await?;
//! AuthHandshake::new(Duration::from_millis(500))
//!     .with_expected_origin("https://app.example.com")
//!     .wait(session)
//!     .await?;
//! ```

use super::error::AuthError;
use crate::core::config::PublisherConfig;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Outcome reported by the popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMessageKind {
    Success,
    Failure(String),
}

/// Message posted from the popup back to the opener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthMessage {
    pub origin: String,
    pub kind: AuthMessageKind,
}

impl AuthMessage {
    pub fn success(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            kind: AuthMessageKind::Success,
        }
    }

    pub fn failure(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            kind: AuthMessageKind::Failure(reason.into()),
        }
    }
}

/// Handle to an open authorization window
#[cfg_attr(test, mockall::automock)]
pub trait AuthWindow: Send + Sync {
    fn is_closed(&self) -> bool;

    fn close(&self);
}

/// An opened popup together with its message channel
pub struct PopupSession {
    pub window: Box<dyn AuthWindow>,
    pub messages: mpsc::Receiver<AuthMessage>,
}

/// Opens the authorization URL in an interactive window
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PopupLauncher: Send + Sync {
    async fn launch(&self, url: &str) -> Result<PopupSession, AuthError>;
}

/// Single-resolution wait on a [`PopupSession`]
#[derive(Debug, Clone)]
pub struct AuthHandshake {
    poll_interval: Duration,
    expected_origin: Option<String>,
}

impl AuthHandshake {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            expected_origin: None,
        }
    }

    pub fn from_config(config: &PublisherConfig) -> Self {
        let handshake = Self::new(config.auth_poll_interval());
        match config.message_origin() {
            Some(origin) => handshake.with_expected_origin(origin),
            None => handshake,
        }
    }

    /// Only accept messages from this origin
    pub fn with_expected_origin(mut self, origin: impl Into<String>) -> Self {
        self.expected_origin = Some(origin.into());
        self
    }

    fn accepts(&self, origin: &str) -> bool {
        self.expected_origin
            .as_deref()
            .is_none_or(|expected| expected == origin)
    }

    /// Wait until the popup reports an outcome or is closed.
    ///
    /// A closed message channel counts as cancellation. Once settled the
    /// receiver is closed, the timer dropped, and the window closed if it is
    /// still open, so nothing that arrives later can change the outcome.
    pub async fn wait(&self, session: PopupSession) -> Result<(), AuthError> {
        let PopupSession {
            window,
            mut messages,
        } = session;

        let mut ticker = tokio::time::interval(self.poll_interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        let outcome = loop {
            tokio::select! {
                biased;

                message = messages.recv() => match message {
                    Some(message) if !self.accepts(&message.origin) => {
                        tracing::debug!(origin = %message.origin, "ignoring message from unexpected origin");
                    }
                    Some(message) => {
                        break match message.kind {
                            AuthMessageKind::Success => Ok(()),
                            AuthMessageKind::Failure(reason) => Err(AuthError::Rejected(reason)),
                        };
                    }
                    None => break Err(AuthError::Cancelled),
                },
                _ = ticker.tick() => {
                    if window.is_closed() {
                        break Err(AuthError::Cancelled);
                    }
                }
            }
        };

        messages.close();
        drop(ticker);
        if !window.is_closed() {
            window.close();
        }

        match &outcome {
            Ok(()) => tracing::info!("authorization completed"),
            Err(e) => tracing::info!(code = e.code(), reason = %e, "authorization did not complete"),
        }
        outcome
    }
}
