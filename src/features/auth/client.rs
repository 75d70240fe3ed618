//! Admin login against the remote API. The password is only exposed while the
//! request body is encoded and is never logged.

use crate::{
    api::{ApiClient, ApiError},
    features::auth::types::LoginResponse,
    session::Session,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{info, instrument};

const LOGIN_PATH: &str = "/auth/login";

/// Exchange credentials for a bearer token.
///
/// Nothing is persisted here; see [`crate::workflows::login::LoginForm`] for
/// the workflow that stores the session.
///
/// # Errors
/// `Rejected` with the server's message on bad credentials, or any other
/// [`ApiError`] from the request.
#[instrument(skip(api, session, password))]
pub async fn login(
    api: &ApiClient,
    session: &Session,
    username: &str,
    password: &SecretString,
) -> Result<Session, ApiError> {
    let payload = json!({
        "username": username,
        "password": password.expose_secret(),
    });

    let response: LoginResponse = api.post(session, LOGIN_PATH, &payload).await?;

    let session = Session::authenticated(
        SecretString::from(response.token),
        response.username.or_else(|| Some(username.to_string())),
        response.roles,
    );

    if !session.is_authenticated() {
        return Err(ApiError::Decode("login response carried an empty token".to_string()));
    }

    info!("login succeeded");
    Ok(session)
}
