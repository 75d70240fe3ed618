use thiserror::Error;

/// Message shown when no response was received at all.
pub const SERVER_UNAVAILABLE: &str = "server unavailable";

/// Normalized failure of any client operation.
///
/// Every variant ends the triggering action; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Rejected locally before any request was built.
    #[error("{0}")]
    Validation(String),

    /// Non-2xx response. `message` is the envelope's `message` field when the
    /// body carried one; `body` is the trimmed, truncated raw body.
    #[error("request failed ({status}): {}", .message.as_deref().unwrap_or(.body.as_str()))]
    Http {
        status: u16,
        message: Option<String>,
        body: String,
    },

    /// Well-formed envelope with `success=false`.
    #[error("{message}")]
    Rejected { message: String },

    /// No response received, timeouts included.
    #[error("network error: {0}")]
    Network(String),

    /// The request could not be constructed.
    #[error("request error: {0}")]
    Request(String),

    /// The response did not have the expected shape.
    #[error("response error: {0}")]
    Decode(String),

    #[error("another request is already in flight")]
    Busy,

    #[error("not logged in")]
    NotAuthenticated,
}

impl ApiError {
    /// True when the server refused the bearer token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403, .. })
    }

    /// The message the server put in its payload, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } => message.as_deref(),
            Self::Rejected { message } => Some(message),
            _ => None,
        }
    }

    /// Message suitable for showing to the person who triggered the action.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Rejected { message } => message.clone(),
            Self::Http { message, body, .. } => message.clone().unwrap_or_else(|| body.clone()),
            Self::Network(_) => SERVER_UNAVAILABLE.to_string(),
            Self::Request(cause) => format!("request could not be sent: {cause}"),
            Self::Decode(cause) => format!("unexpected response from server: {cause}"),
            Self::Busy => "please wait for the current request to finish".to_string(),
            Self::NotAuthenticated => {
                "not logged in, run `invite-console login` first".to_string()
            }
        }
    }
}
