//! Client-side session checks. These are conveniences only: the server
//! authorizes every request on its own.

use crate::{
    api::ApiError,
    session::{Session, SessionStore, StoreError},
};
use tracing::{info, warn};

/// Load the stored session and refuse to continue without a token.
///
/// # Errors
/// [`ApiError::NotAuthenticated`] when no token is stored or the store cannot
/// be read.
pub fn require_admin(store: &dyn SessionStore) -> Result<Session, ApiError> {
    let session = store.load().map_err(|err| {
        warn!("failed to load session: {err}");
        ApiError::NotAuthenticated
    })?;

    if session.is_authenticated() {
        Ok(session)
    } else {
        Err(ApiError::NotAuthenticated)
    }
}

/// Forget the stored token unconditionally.
///
/// # Errors
/// Returns an error if the store cannot be modified.
pub fn logout(store: &dyn SessionStore) -> Result<(), StoreError> {
    store.clear()?;
    info!("session cleared");
    Ok(())
}

/// Apply the `server rejects token` transition: when `err` is a 401/403, the
/// stored session is cleared. Returns whether it was.
///
/// # Errors
/// Returns an error if the store cannot be modified.
pub fn forget_on_rejection(store: &dyn SessionStore, err: &ApiError) -> Result<bool, StoreError> {
    if !err.is_unauthorized() {
        return Ok(false);
    }
    warn!("server rejected the session token, logging out");
    store.clear()?;
    Ok(true)
}
