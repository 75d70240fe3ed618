//! HTTP access to the invite code API.
//!
//! All endpoint clients go through [`ApiClient`] so that request setup,
//! timeouts and error normalization live in one place. Request construction is
//! a pure function of the [`Session`] and the call parameters: the client never
//! reads the token from ambient storage, it only attaches the one it is given.
//!
//! Flow:
//! - [`ApiClient::build_request`] joins the base URL and path, adds query
//!   parameters, JSON headers, an optional JSON body and the bearer token.
//! - [`ApiClient::execute`] sends it. Transport failures map to
//!   [`ApiError::Network`], non-2xx responses to [`ApiError::Http`] carrying the
//!   status, the envelope `message` and a sanitized copy of the body.
//! - Successful bodies are decoded as [`ApiEnvelope`] and unwrapped by the
//!   caller.

pub mod envelope;
pub mod errors;

pub use self::envelope::{ApiEnvelope, Page};
pub use self::errors::{ApiError, SERVER_UNAVAILABLE};

use crate::session::Session;
use reqwest::{
    header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, Request, Response,
};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info_span, Instrument};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
/// Wall-clock bound applied to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters kept in [`ApiError::Http`].
const MAX_ERROR_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    /// Returns [`ApiError::Request`] if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::Request(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path` under the configured base.
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }

    /// Construct a request without sending it.
    ///
    /// # Errors
    /// Returns [`ApiError::Request`] if the body cannot be encoded, the token is
    /// not a valid header value, or the URL is malformed.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Request, ApiError> {
        let url = self.endpoint_url(path);
        let mut builder = self
            .http
            .request(method, &url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");

        if !query.is_empty() {
            builder = builder.query(query);
        }

        if let Some(token) = session.token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|err| ApiError::Request(format!("invalid bearer token: {err}")))?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }

        if let Some(body) = body {
            let payload = serde_json::to_vec(body)
                .map_err(|err| ApiError::Request(format!("failed to encode request: {err}")))?;
            builder = builder.body(payload);
        }

        builder
            .build()
            .map_err(|err| ApiError::Request(format!("failed to build request: {err}")))
    }

    /// Send a prepared request and return the successful response.
    ///
    /// # Errors
    /// [`ApiError::Network`] when no response arrives, [`ApiError::Http`] for
    /// any non-2xx status.
    pub async fn execute(&self, request: Request) -> Result<Response, ApiError> {
        let span = info_span!(
            "api.request",
            http.method = %request.method(),
            url = %request.url()
        );

        async move {
            debug!("sending request");
            let response = self.http.execute(request).await.map_err(map_send_error)?;
            let status = response.status();
            debug!(status = status.as_u16(), "received response");

            if status.is_success() {
                Ok(response)
            } else {
                Err(error_from_response(response).await)
            }
        }
        .instrument(span)
        .await
    }

    /// Send a request and decode the envelope without interpreting `success`.
    ///
    /// # Errors
    /// See [`ApiClient::build_request`] and [`ApiClient::execute`]; also
    /// [`ApiError::Decode`] if the body is not an envelope.
    pub async fn envelope<B, T>(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<ApiEnvelope<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build_request(session, method, path, query, body)?;
        let response = self.execute(request).await?;
        response
            .json::<ApiEnvelope<T>>()
            .await
            .map_err(|err| ApiError::Decode(format!("failed to decode response: {err}")))
    }

    /// `GET` returning the envelope's `data`.
    ///
    /// # Errors
    /// Any [`ApiError`]; `Rejected` when the envelope reports failure.
    pub async fn get<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.envelope::<(), T>(session, Method::GET, path, query, None)
            .await?
            .into_data()
    }

    /// `POST` a JSON body, returning the envelope's `data`.
    ///
    /// # Errors
    /// Any [`ApiError`]; `Rejected` when the envelope reports failure.
    pub async fn post<B, T>(&self, session: &Session, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.envelope(session, Method::POST, path, &[], Some(body))
            .await?
            .into_data()
    }

    /// `PUT` without a body; `data` may be absent.
    ///
    /// # Errors
    /// Any [`ApiError`]; `Rejected` when the envelope reports failure.
    pub async fn put<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
    ) -> Result<Option<T>, ApiError> {
        self.envelope::<(), T>(session, Method::PUT, path, &[], None)
            .await?
            .into_ack()
    }
}

/// Join `base_url` and `path` with exactly one slash.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn map_send_error(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        return ApiError::Request(err.to_string());
    }
    if err.is_timeout() {
        return ApiError::Network(format!("request timed out: {err}"));
    }
    ApiError::Network(format!("unable to reach the server: {err}"))
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    debug!(status, body = %body, "error response");

    ApiError::Http {
        status,
        message: envelope_message(&body),
        body: sanitize_body(&body),
    }
}

/// `message` field of a JSON error payload, when present and non-empty.
fn envelope_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(ToString::to_string)
}

fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use secrecy::SecretString;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client(base_url: &str) -> Result<ApiClient> {
        Ok(ApiClient::new(&ClientConfig::new(base_url))?)
    }

    fn admin() -> Session {
        Session::authenticated(SecretString::from("jwt-abc"), None, Vec::new())
    }

    #[test]
    fn build_url_joins_with_single_slash() {
        assert_eq!(
            build_url_with_base("http://host/api/", "/invite-codes"),
            "http://host/api/invite-codes"
        );
        assert_eq!(
            build_url_with_base("http://host/api", "invite-codes"),
            "http://host/api/invite-codes"
        );
        assert_eq!(build_url_with_base("  ", "/invite-codes"), "/invite-codes");
    }

    #[test]
    fn build_request_attaches_bearer_when_logged_in() -> Result<()> {
        let api = client("http://localhost:8080/api")?;
        let request =
            api.build_request::<()>(&admin(), Method::GET, "/invite-codes/1", &[], None)?;

        let auth = request
            .headers()
            .get(AUTHORIZATION)
            .ok_or_else(|| anyhow!("missing Authorization header"))?;
        assert_eq!(auth.to_str()?, "Bearer jwt-abc");
        assert!(auth.is_sensitive());
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8080/api/invite-codes/1"
        );
        Ok(())
    }

    #[test]
    fn build_request_omits_bearer_when_logged_out() -> Result<()> {
        let api = client("http://localhost:8080/api")?;
        let request = api.build_request(
            &Session::anonymous(),
            Method::POST,
            "/invite-codes/verify",
            &[],
            Some(&json!({"code": "ABC123", "userId": ""})),
        )?;

        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(
            request
                .headers()
                .get(CONTENT_TYPE)
                .map(HeaderValue::to_str)
                .transpose()?,
            Some("application/json")
        );
        let body = request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .ok_or_else(|| anyhow!("missing body"))?;
        let sent: Value = serde_json::from_slice(body)?;
        assert_eq!(sent, json!({"code": "ABC123", "userId": ""}));
        Ok(())
    }

    #[test]
    fn build_request_encodes_query() -> Result<()> {
        let api = client("http://localhost:8080/api")?;
        let request = api.build_request::<()>(
            &admin(),
            Method::GET,
            "/invite-codes",
            &[("page", "2".to_string()), ("sortBy", "createdAt".to_string())],
            None,
        )?;
        assert_eq!(request.url().query(), Some("page=2&sortBy=createdAt"));
        Ok(())
    }

    #[test]
    fn build_request_rejects_unusable_token() -> Result<()> {
        let api = client("http://localhost:8080/api")?;
        let session = Session::authenticated(SecretString::from("bad\ntoken"), None, Vec::new());
        let result = api.build_request::<()>(&session, Method::GET, "/invite-codes", &[], None);
        assert!(matches!(result, Err(ApiError::Request(_))));
        Ok(())
    }

    #[test]
    fn build_request_rejects_malformed_url() -> Result<()> {
        let api = client("not a url")?;
        let result = api.build_request::<()>(&Session::anonymous(), Method::GET, "/x", &[], None);
        assert!(matches!(result, Err(ApiError::Request(_))));
        Ok(())
    }

    #[test]
    fn sanitize_body_trims_and_truncates() {
        assert_eq!(sanitize_body("   "), "Request failed.");
        assert_eq!(sanitize_body("  oops "), "oops");
        assert_eq!(sanitize_body(&"x".repeat(500)).len(), MAX_ERROR_CHARS);
    }

    #[test]
    fn envelope_message_reads_json_payloads_only() {
        assert_eq!(
            envelope_message(r#"{"success":false,"message":"token expired"}"#),
            Some("token expired".to_string())
        );
        assert_eq!(envelope_message(r#"{"success":false,"message":""}"#), None);
        assert_eq!(envelope_message("<html>502</html>"), None);
    }

    #[tokio::test]
    async fn get_unwraps_envelope_data() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/things"))
            .and(query_param("page", "0"))
            .and(header("Authorization", "Bearer jwt-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"value": 7}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&format!("{}/api", server.uri()))?;
        let data: Value = api
            .get(&admin(), "/things", &[("page", "0".to_string())])
            .await?;
        assert_eq!(data, json!({"value": 7}));
        Ok(())
    }

    #[tokio::test]
    async fn post_surfaces_rejection_from_ok_status() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/things"))
            .and(body_json(json!({"name": "x"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "invite code does not exist"
            })))
            .mount(&server)
            .await;

        let api = client(&format!("{}/api", server.uri()))?;
        let result: Result<Value, ApiError> =
            api.post(&admin(), "/things", &json!({"name": "x"})).await;
        assert_eq!(
            result,
            Err(ApiError::Rejected {
                message: "invite code does not exist".to_string()
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn error_status_keeps_status_and_server_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/secure"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "message": "token expired"
            })))
            .mount(&server)
            .await;

        let api = client(&format!("{}/api", server.uri()))?;
        let err = api
            .get::<Value>(&admin(), "/secure", &[])
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;

        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), Some("token expired"));
        match err {
            ApiError::Http { status, body, .. } => {
                assert_eq!(status, 401);
                assert!(body.contains("token expired"));
            }
            other => return Err(anyhow!("unexpected error: {other:?}")),
        }
        Ok(())
    }

    #[tokio::test]
    async fn error_status_with_plain_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/things/1/disable"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let api = client(&format!("{}/api", server.uri()))?;
        let result = api.put::<Value>(&admin(), "/things/1/disable").await;
        assert_eq!(
            result,
            Err(ApiError::Http {
                status: 500,
                message: None,
                body: "Internal Server Error".to_string(),
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn malformed_success_body_is_decode_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/things"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let api = client(&format!("{}/api", server.uri()))?;
        let result = api.get::<Value>(&admin(), "/things", &[]).await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        // Bind then drop to get a port nobody listens on.
        let port = TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();

        let api = client(&format!("http://127.0.0.1:{port}/api"))?;
        let result = api.get::<Value>(&admin(), "/things", &[]).await;
        let err = result.err().ok_or_else(|| anyhow!("expected error"))?;
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(err.user_message(), SERVER_UNAVAILABLE);
        Ok(())
    }

    #[tokio::test]
    async fn slow_server_times_out_as_network_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "data": 1}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = ClientConfig {
            base_url: format!("{}/api", server.uri()),
            timeout: Duration::from_millis(50),
        };
        let api = ApiClient::new(&config)?;
        let result = api.get::<Value>(&admin(), "/slow", &[]).await;
        assert!(matches!(result, Err(ApiError::Network(_))));
        Ok(())
    }
}
