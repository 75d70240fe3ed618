//! Admin session state.
//!
//! A [`Session`] is either logged out or holds one bearer token. The token is
//! never inspected locally: its presence is enough to attempt admin calls and
//! the server decides on every request whether it is still good. Sessions are
//! passed explicitly into each outbound call rather than read from ambient
//! storage; [`store`] persists them between runs.

pub mod store;

pub use self::store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

#[derive(Clone, Default)]
pub struct Session {
    token: Option<SecretString>,
    username: Option<String>,
    roles: Vec<String>,
}

impl Session {
    /// A session with no credentials.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A logged-in session. An empty token yields a logged-out session.
    #[must_use]
    pub fn authenticated(token: SecretString, username: Option<String>, roles: Vec<String>) -> Self {
        if token.expose_secret().trim().is_empty() {
            return Self::anonymous();
        }
        Self {
            token: Some(token),
            username,
            roles,
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.token.is_some() {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::LoggedIn
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("username", &self.username)
            .field("roles", &self.roles)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_is_logged_out() {
        let session = Session::anonymous();
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert!(session.token().is_none());
    }

    #[test]
    fn authenticated_is_logged_in() {
        let session = Session::authenticated(
            SecretString::from("jwt-token"),
            Some("admin".to_string()),
            vec!["ROLE_ADMIN".to_string()],
        );
        assert_eq!(session.state(), SessionState::LoggedIn);
        assert_eq!(session.username(), Some("admin"));
        assert_eq!(session.roles(), ["ROLE_ADMIN".to_string()]);
        assert_eq!(
            session.token().map(|token| token.expose_secret().to_string()),
            Some("jwt-token".to_string())
        );
    }

    #[test]
    fn blank_token_is_logged_out() {
        let session = Session::authenticated(SecretString::from("  "), None, Vec::new());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn debug_masks_token() {
        let session = Session::authenticated(SecretString::from("very-secret"), None, Vec::new());
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("***"));
    }
}
