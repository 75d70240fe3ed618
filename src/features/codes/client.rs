//! Client helpers for the invite code admin endpoints. Paths are centralized
//! here; every call takes the session explicitly and the server enforces
//! authorization on each of them.

use crate::{
    api::{ApiClient, ApiError, Page},
    features::codes::types::{
        CodeId, CodeQuery, GenerateRequest, InviteCode, UsageQuery, UsageRecord,
    },
    session::Session,
};
use tracing::{debug, instrument};

const CODES_PATH: &str = "/invite-codes";

/// Percent-encode user input so it stays one path segment.
fn path_segment(value: &str, missing: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(missing.to_string()));
    }
    if value == "." || value == ".." {
        return Err(ApiError::Validation(format!("Invalid invite code: {value}")));
    }
    Ok(urlencoding::encode(value).into_owned())
}

fn code_path(id: &CodeId, suffix: &str) -> Result<String, ApiError> {
    let id = path_segment(id.as_str(), "Invite code id is required.")?;
    Ok(format!("{CODES_PATH}/{id}{suffix}"))
}

/// `POST /invite-codes/generate`
///
/// # Errors
/// Any [`ApiError`] from the request.
#[instrument(skip(api, session), fields(count = request.count))]
pub async fn generate(
    api: &ApiClient,
    session: &Session,
    request: &GenerateRequest,
) -> Result<Vec<InviteCode>, ApiError> {
    let codes: Vec<InviteCode> = api
        .post(session, &format!("{CODES_PATH}/generate"), request)
        .await?;
    debug!(generated = codes.len(), "generate returned");
    Ok(codes)
}

/// `GET /invite-codes?page&size&sortBy&direction`
///
/// # Errors
/// Any [`ApiError`] from the request.
#[instrument(skip(api, session))]
pub async fn list(
    api: &ApiClient,
    session: &Session,
    query: &CodeQuery,
) -> Result<Page<InviteCode>, ApiError> {
    api.get(session, CODES_PATH, &query.to_params()).await
}

/// `GET /invite-codes/{id}`
///
/// # Errors
/// Any [`ApiError`]; a missing code comes back as `Rejected`.
#[instrument(skip(api, session))]
pub async fn get(api: &ApiClient, session: &Session, id: &CodeId) -> Result<InviteCode, ApiError> {
    api.get(session, &code_path(id, "")?, &[]).await
}

/// `GET /invite-codes/code/{code}`
///
/// # Errors
/// Any [`ApiError`]; an unknown code comes back as `Rejected`.
#[instrument(skip(api, session))]
pub async fn find_by_code(
    api: &ApiClient,
    session: &Session,
    code: &str,
) -> Result<InviteCode, ApiError> {
    let code = path_segment(code, "Invite code is required.")?;
    api.get(session, &format!("{CODES_PATH}/code/{code}"), &[]).await
}

/// `GET /invite-codes/{id}/usage-records?page&size`
///
/// # Errors
/// Any [`ApiError`] from the request.
#[instrument(skip(api, session))]
pub async fn usage_records(
    api: &ApiClient,
    session: &Session,
    id: &CodeId,
    query: &UsageQuery,
) -> Result<Page<UsageRecord>, ApiError> {
    api.get(session, &code_path(id, "/usage-records")?, &query.to_params())
        .await
}

/// `PUT /invite-codes/{id}/disable`. Returns the updated code when the server
/// includes it.
///
/// # Errors
/// Any [`ApiError`] from the request.
#[instrument(skip(api, session))]
pub async fn disable(
    api: &ApiClient,
    session: &Session,
    id: &CodeId,
) -> Result<Option<InviteCode>, ApiError> {
    api.put(session, &code_path(id, "/disable")?).await
}

/// `PUT /invite-codes/{id}/enable`. Returns the updated code when the server
/// includes it.
///
/// # Errors
/// Any [`ApiError`] from the request.
#[instrument(skip(api, session))]
pub async fn enable(
    api: &ApiClient,
    session: &Session,
    id: &CodeId,
) -> Result<Option<InviteCode>, ApiError> {
    api.put(session, &code_path(id, "/enable")?).await
}
