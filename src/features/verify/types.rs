use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub code: String,
    /// Sent as an empty string when not provided.
    pub user_id: String,
}

/// Accept or reject, with the server's explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    pub success: bool,
    pub message: String,
}
