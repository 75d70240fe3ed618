//! Batch code generation.

use crate::{
    api::{ApiClient, ApiError},
    features::codes::{client, GenerateRequest, InviteCode},
    session::Session,
    workflows::loading::LoadingGate,
};
use tracing::{info, warn};

pub const MIN_COUNT: u32 = 1;
pub const MAX_COUNT: u32 = 100;
pub const DEFAULT_COUNT: u32 = 10;
pub const COUNT_RANGE_MESSAGE: &str = "Enter a number between 1 and 100";

const FAILURE_PREFIX: &str = "Failed to generate codes";

/// Check `count` against `[MIN_COUNT, MAX_COUNT]`.
///
/// # Errors
/// `Validation` with [`COUNT_RANGE_MESSAGE`] when out of range.
pub fn validate_count(count: i64) -> Result<u32, ApiError> {
    u32::try_from(count)
        .ok()
        .filter(|count| (MIN_COUNT..=MAX_COUNT).contains(count))
        .ok_or_else(|| ApiError::Validation(COUNT_RANGE_MESSAGE.to_string()))
}

/// Text shown when generation fails, tailored to why it failed.
#[must_use]
pub fn failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Http { message, .. } => format!(
            "{FAILURE_PREFIX}: {}",
            message.as_deref().unwrap_or("server error")
        ),
        ApiError::Rejected { message } => format!("{FAILURE_PREFIX}: {message}"),
        ApiError::Network(_) => format!("{FAILURE_PREFIX}: server did not respond"),
        ApiError::Request(cause) | ApiError::Decode(cause) => {
            format!("{FAILURE_PREFIX}: {cause}")
        }
        ApiError::Validation(message) => message.clone(),
        ApiError::Busy | ApiError::NotAuthenticated => err.user_message(),
    }
}

#[derive(Debug, Clone)]
pub struct GenerateForm {
    /// Raw count as entered; validated on submit.
    pub count: i64,
    pub description: String,
    gate: LoadingGate,
}

impl Default for GenerateForm {
    fn default() -> Self {
        Self {
            count: i64::from(DEFAULT_COUNT),
            description: String::new(),
            gate: LoadingGate::new(),
        }
    }
}

impl GenerateForm {
    #[must_use]
    pub fn new(count: i64, description: impl Into<String>) -> Self {
        Self {
            count,
            description: description.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn gate(&self) -> &LoadingGate {
        &self.gate
    }

    /// Generate one batch.
    ///
    /// # Errors
    /// `Validation` for an out-of-range count (no request is sent), `Busy`
    /// while a batch is being generated, `Decode` if the server returned no
    /// codes, or any other [`ApiError`] from the call.
    pub async fn submit(
        &self,
        api: &ApiClient,
        session: &Session,
    ) -> Result<GeneratedBatch, ApiError> {
        let count = validate_count(self.count)?;
        let _in_flight = self.gate.try_begin()?;

        let request = GenerateRequest {
            count,
            description: self.description.trim().to_string(),
        };

        let codes = client::generate(api, session, &request)
            .await
            .inspect_err(|err| warn!("{}", failure_message(err)))?;

        if codes.is_empty() {
            return Err(ApiError::Decode("server returned no codes".to_string()));
        }

        info!(count = codes.len(), "generated invite codes");
        Ok(GeneratedBatch { codes })
    }
}

/// Codes from one successful generate call, in server order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBatch {
    codes: Vec<InviteCode>,
}

impl GeneratedBatch {
    #[must_use]
    pub fn codes(&self) -> &[InviteCode] {
        &self.codes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Text copied for the code at `index`.
    #[must_use]
    pub fn copy_one(&self, index: usize) -> Option<&str> {
        self.codes.get(index).map(|code| code.code.as_str())
    }

    /// Every code, newline separated.
    #[must_use]
    pub fn copy_all(&self) -> String {
        self.codes
            .iter()
            .map(|code| code.code.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Batch id shared by the codes, when the server reports one.
    #[must_use]
    pub fn batch_id(&self) -> Option<&str> {
        self.codes.iter().find_map(|code| code.batch_id.as_deref())
    }
}
