//! Confirm-before-mutate for enabling and disabling codes.
//!
//! A view hands out a [`ToggleIntent`]; nothing is sent until the caller
//! resolves it with [`Decision::Confirmed`].

use crate::{
    api::{ApiClient, ApiError},
    features::codes::{client, CodeId, InviteCode},
    session::Session,
};
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Enable,
    Disable,
}

impl ToggleAction {
    /// The action offered for a code in the given state.
    #[must_use]
    pub fn for_active(active: bool) -> Self {
        if active {
            Self::Disable
        } else {
            Self::Enable
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Enable => "Confirm enable",
            Self::Disable => "Confirm disable",
        }
    }

    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Enable => "Once enabled, this code can be used again. Continue?",
            Self::Disable => "Once disabled, this code can no longer be used. Continue?",
        }
    }

    #[must_use]
    pub fn done_message(self) -> &'static str {
        match self {
            Self::Enable => "Invite code enabled",
            Self::Disable => "Invite code disabled",
        }
    }
}

/// A pending enable or disable that has not been confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a toggle intent does nothing until it is resolved"]
pub struct ToggleIntent {
    id: CodeId,
    action: ToggleAction,
}

impl ToggleIntent {
    pub fn new(id: CodeId, action: ToggleAction) -> Self {
        Self { id, action }
    }

    /// Intent to flip `code` to the opposite of its current state.
    pub fn for_code(code: &InviteCode) -> Self {
        Self::new(code.id.clone(), ToggleAction::for_active(code.active))
    }

    #[must_use]
    pub fn id(&self) -> &CodeId {
        &self.id
    }

    #[must_use]
    pub fn action(&self) -> ToggleAction {
        self.action
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirmed,
    Cancelled,
}

impl From<bool> for Decision {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Cancelled
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Cancelled,
    /// The call went through. Carries the updated code when the server
    /// returned one; views re-fetch either way.
    Applied {
        action: ToggleAction,
        code: Option<InviteCode>,
    },
}

impl ToggleOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Execute `intent` if and only if it was confirmed. Exactly one mutating
/// call is made on confirmation.
///
/// # Errors
/// Any [`ApiError`] from the enable or disable call.
#[instrument(skip(api, session), fields(id = %intent.id, action = ?intent.action))]
pub async fn resolve(
    api: &ApiClient,
    session: &Session,
    intent: ToggleIntent,
    decision: Decision,
) -> Result<ToggleOutcome, ApiError> {
    if decision == Decision::Cancelled {
        info!("toggle cancelled");
        return Ok(ToggleOutcome::Cancelled);
    }

    let code = match intent.action {
        ToggleAction::Enable => client::enable(api, session, &intent.id).await?,
        ToggleAction::Disable => client::disable(api, session, &intent.id).await?,
    };

    info!("{}", intent.action.done_message());
    Ok(ToggleOutcome::Applied {
        action: intent.action,
        code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientConfig;
    use anyhow::Result;
    use secrecy::SecretString;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn admin() -> Session {
        Session::authenticated(SecretString::from("token"), None, Vec::new())
    }

    #[test]
    fn action_follows_current_state() {
        assert_eq!(ToggleAction::for_active(true), ToggleAction::Disable);
        assert_eq!(ToggleAction::for_active(false), ToggleAction::Enable);
        assert_eq!(ToggleAction::Disable.title(), "Confirm disable");
        assert_eq!(Decision::from(false), Decision::Cancelled);
    }

    #[tokio::test]
    async fn cancelled_toggle_sends_nothing() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let api = ApiClient::new(&ClientConfig::new(format!("{}/api", server.uri())))?;
        let intent = ToggleIntent::new(CodeId::from(7u64), ToggleAction::Disable);
        let outcome = resolve(&api, &admin(), intent, Decision::Cancelled).await?;
        assert_eq!(outcome, ToggleOutcome::Cancelled);
        Ok(())
    }

    #[tokio::test]
    async fn confirmed_enable_calls_endpoint_once() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/invite-codes/7/enable"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"id": 7, "code": "ABC123", "active": true}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&ClientConfig::new(format!("{}/api", server.uri())))?;
        let intent = ToggleIntent::new(CodeId::from(7u64), ToggleAction::Enable);
        let outcome = resolve(&api, &admin(), intent, Decision::Confirmed).await?;

        match outcome {
            ToggleOutcome::Applied { action, code } => {
                assert_eq!(action, ToggleAction::Enable);
                assert_eq!(code.map(|c| c.active), Some(true));
            }
            ToggleOutcome::Cancelled => anyhow::bail!("expected applied outcome"),
        }
        Ok(())
    }
}
