//! Interactive OAuth authorization.
//!
//! - [`error::AuthError`] - outcome of a failed or cancelled authorization
//! - [`handshake`] - popup window / message channel race

pub mod error;
pub mod handshake;

pub use error::AuthError;
pub use handshake::{
    AuthHandshake, AuthMessage, AuthMessageKind, AuthWindow, PopupLauncher, PopupSession,
};
