//! Admin login form. A successful login is persisted through the
//! [`SessionStore`]; a failed one persists nothing.

use crate::{
    api::{ApiClient, ApiError},
    features::auth::client,
    session::{Session, SessionStore, StoreError},
    workflows::loading::LoadingGate,
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info, warn};

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed, check username and password";
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Please enter a username and password";

#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LoginError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Store(err) => err.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    password: SecretString,
    error: Option<String>,
    gate: LoadingGate,
}

impl LoginForm {
    #[must_use]
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
            error: None,
            gate: LoadingGate::new(),
        }
    }

    pub fn set_password(&mut self, password: SecretString) {
        self.password = password;
    }

    /// Message shown after the last failed attempt.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn gate(&self) -> &LoadingGate {
        &self.gate
    }

    /// Log in and persist the resulting session.
    ///
    /// # Errors
    /// `Validation` for missing credentials, `Busy` while an attempt is in
    /// flight, the server's error on failure, or a storage error if the
    /// session could not be saved.
    pub async fn submit(
        &mut self,
        api: &ApiClient,
        store: &dyn SessionStore,
    ) -> Result<Session, LoginError> {
        let username = self.username.trim().to_string();
        if username.is_empty() || self.password.expose_secret().is_empty() {
            self.error = Some(MISSING_CREDENTIALS_MESSAGE.to_string());
            return Err(ApiError::Validation(MISSING_CREDENTIALS_MESSAGE.to_string()).into());
        }

        let _in_flight = self.gate.try_begin()?;
        self.error = None;

        match client::login(api, &Session::anonymous(), &username, &self.password).await {
            Ok(session) => {
                store.save(&session)?;
                info!(username = %username, "admin session stored");
                Ok(session)
            }
            Err(err) => {
                warn!("login failed: {err}");
                self.error = Some(
                    err.server_message()
                        .unwrap_or(LOGIN_FAILED_MESSAGE)
                        .to_string(),
                );
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientConfig;
    use crate::session::MemorySessionStore;
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[tokio::test]
    async fn successful_login_is_persisted() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"token": "jwt", "username": "admin", "roles": ["ROLE_ADMIN"]}
            })))
            .mount(&server)
            .await;

        let api = ApiClient::new(&ClientConfig::new(format!("{}/api", server.uri())))?;
        let store = MemorySessionStore::new();
        let mut form = LoginForm::new("admin", SecretString::from("secret"));

        let session = form.submit(&api, &store).await?;
        assert!(session.is_authenticated());
        assert!(store.load()?.is_authenticated());
        assert_eq!(form.error(), None);
        Ok(())
    }

    #[tokio::test]
    async fn failed_login_persists_nothing() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let api = ApiClient::new(&ClientConfig::new(format!("{}/api", server.uri())))?;
        let store = MemorySessionStore::new();
        let mut form = LoginForm::new("admin", SecretString::from("wrong"));

        assert!(form.submit(&api, &store).await.is_err());
        assert!(!store.load()?.is_authenticated());
        assert_eq!(form.error(), Some(LOGIN_FAILED_MESSAGE));
        Ok(())
    }

    #[tokio::test]
    async fn server_message_shown_verbatim() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "account locked"
            })))
            .mount(&server)
            .await;

        let api = ApiClient::new(&ClientConfig::new(format!("{}/api", server.uri())))?;
        let store = MemorySessionStore::new();
        let mut form = LoginForm::new("admin", SecretString::from("pw"));

        assert!(form.submit(&api, &store).await.is_err());
        assert_eq!(form.error(), Some("account locked"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_credentials_are_rejected_locally() -> Result<()> {
        let api = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9/api"))?;
        let store = MemorySessionStore::new();
        let mut form = LoginForm::new("", SecretString::from("pw"));

        let result = form.submit(&api, &store).await;
        assert!(matches!(
            result,
            Err(LoginError::Api(ApiError::Validation(_)))
        ));
        assert_eq!(form.error(), Some(MISSING_CREDENTIALS_MESSAGE));
        Ok(())
    }
}
