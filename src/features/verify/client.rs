//! Public redemption endpoint. Verification needs no admin session, but the
//! caller's session is still passed through so request construction stays
//! uniform.

use crate::{
    api::{ApiClient, ApiError},
    features::verify::types::{VerifyOutcome, VerifyRequest},
    session::Session,
};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument};

const VERIFY_PATH: &str = "/invite-codes/verify";

/// `POST /invite-codes/verify`, called exactly once.
///
/// An envelope with `success=false` is an outcome, not an error: the server
/// uses it for unknown and disabled codes.
///
/// # Errors
/// Transport, HTTP and decode failures.
#[instrument(skip(api, session, request), fields(code_len = request.code.len()))]
pub async fn verify(
    api: &ApiClient,
    session: &Session,
    request: &VerifyRequest,
) -> Result<VerifyOutcome, ApiError> {
    let envelope = api
        .envelope::<_, Value>(session, Method::POST, VERIFY_PATH, &[], Some(request))
        .await?;

    debug!(success = envelope.success, "verify returned");

    Ok(VerifyOutcome {
        success: envelope.success,
        message: envelope.message.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientConfig;
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[tokio::test]
    async fn verify_reports_rejection_as_outcome() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/invite-codes/verify"))
            .and(body_json(json!({"code": "DISABLED1", "userId": ""})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "invalid invite code"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&ClientConfig::new(format!("{}/api", server.uri())))?;
        let request = VerifyRequest {
            code: "DISABLED1".to_string(),
            user_id: String::new(),
        };
        let outcome = verify(&api, &Session::anonymous(), &request).await?;

        assert_eq!(
            outcome,
            VerifyOutcome {
                success: false,
                message: "invalid invite code".to_string()
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn verify_reports_success() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/invite-codes/verify"))
            .and(body_json(json!({"code": "GOOD1234", "userId": "user-9"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "invite code verified",
                "data": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&ClientConfig::new(format!("{}/api", server.uri())))?;
        let request = VerifyRequest {
            code: "GOOD1234".to_string(),
            user_id: "user-9".to_string(),
        };
        let outcome = verify(&api, &Session::anonymous(), &request).await?;
        assert!(outcome.success);
        assert_eq!(outcome.message, "invite code verified");
        Ok(())
    }
}
