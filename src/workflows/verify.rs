use crate::{
    api::{ApiClient, ApiError},
    features::verify::{client, VerifyOutcome, VerifyRequest},
    session::Session,
    workflows::loading::LoadingGate,
};
use tracing::{info, warn};

pub const BLANK_CODE_MESSAGE: &str = "Please enter an invite code";
pub const VERIFY_FALLBACK_MESSAGE: &str = "Verification failed, please try again later";

/// Code redemption form. Fields are cleared after the server accepts a code
/// and left untouched otherwise so the user can retry.
#[derive(Debug, Clone, Default)]
pub struct VerifyForm {
    pub code: String,
    pub user_id: String,
    gate: LoadingGate,
}

impl VerifyForm {
    #[must_use]
    pub fn new(code: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            user_id: user_id.into(),
            gate: LoadingGate::new(),
        }
    }

    #[must_use]
    pub fn gate(&self) -> &LoadingGate {
        &self.gate
    }

    /// Submit the form once.
    ///
    /// Transport and HTTP failures are folded into an unsuccessful outcome.
    ///
    /// # Errors
    /// `Validation` for a blank code and `Busy` while a submission is in
    /// flight. Neither sends a request.
    pub async fn submit(
        &mut self,
        api: &ApiClient,
        session: &Session,
    ) -> Result<VerifyOutcome, ApiError> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err(ApiError::Validation(BLANK_CODE_MESSAGE.to_string()));
        }

        let _in_flight = self.gate.try_begin()?;

        let request = VerifyRequest {
            code: code.to_string(),
            user_id: self.user_id.trim().to_string(),
        };

        let outcome = match client::verify(api, session, &request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("verification request failed: {err}");
                VerifyOutcome {
                    success: false,
                    message: err
                        .server_message()
                        .unwrap_or(VERIFY_FALLBACK_MESSAGE)
                        .to_string(),
                }
            }
        };

        if outcome.success {
            info!("invite code accepted");
            self.code.clear();
            self.user_id.clear();
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientConfig;
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[tokio::test]
    async fn blank_code_is_rejected_locally() -> Result<()> {
        let api = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9/api"))?;
        let mut form = VerifyForm::new("   ", "");
        let err = form.submit(&api, &Session::anonymous()).await.err();
        assert_eq!(
            err,
            Some(ApiError::Validation(BLANK_CODE_MESSAGE.to_string()))
        );
        Ok(())
    }

    #[tokio::test]
    async fn http_error_without_message_uses_fallback() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/invite-codes/verify"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = ApiClient::new(&ClientConfig::new(format!("{}/api", server.uri())))?;
        let mut form = VerifyForm::new("ABC123", "user-1");
        let outcome = form.submit(&api, &Session::anonymous()).await?;

        assert!(!outcome.success);
        assert_eq!(outcome.message, VERIFY_FALLBACK_MESSAGE);
        assert_eq!(form.code, "ABC123");
        assert!(!form.gate().is_loading());
        Ok(())
    }

    #[tokio::test]
    async fn http_error_with_envelope_keeps_server_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/invite-codes/verify"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "message": "code format is invalid"
            })))
            .mount(&server)
            .await;

        let api = ApiClient::new(&ClientConfig::new(format!("{}/api", server.uri())))?;
        let mut form = VerifyForm::new("??", "");
        let outcome = form.submit(&api, &Session::anonymous()).await?;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "code format is invalid");
        Ok(())
    }

    #[tokio::test]
    async fn busy_form_sends_nothing() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/invite-codes/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(0)
            .mount(&server)
            .await;

        let api = ApiClient::new(&ClientConfig::new(format!("{}/api", server.uri())))?;
        let mut form = VerifyForm::new("ABC123", "");
        let held = form.gate().try_begin()?;

        let result = form.submit(&api, &Session::anonymous()).await;
        assert!(matches!(result, Err(ApiError::Busy)));
        drop(held);
        Ok(())
    }
}
