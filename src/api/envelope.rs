//! Response wrappers shared by every endpoint: the `{success, message, data}`
//! envelope and the server's page object.

use super::errors::ApiError;
use serde::{Deserialize, Serialize};

/// Message used when the server rejects a request without saying why.
const DEFAULT_REJECTION: &str = "request rejected by server";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Returns `data` once `success` is confirmed.
    ///
    /// # Errors
    /// `Rejected` when `success` is false, `Decode` when `data` is absent.
    pub fn into_data(self) -> Result<T, ApiError> {
        self.into_ack()?
            .ok_or_else(|| ApiError::Decode("response is missing `data`".to_string()))
    }

    /// Like [`ApiEnvelope::into_data`] but tolerates an empty acknowledgement.
    ///
    /// # Errors
    /// `Rejected` when `success` is false.
    pub fn into_ack(self) -> Result<Option<T>, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::Rejected {
                message: self
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
            })
        }
    }
}

/// One page of a server-side listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: Option<u64>,
    /// Zero-based index of this page.
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}

impl<T> Page<T> {
    /// Number of pages for `size` items per page, preferring the server's count.
    #[must_use]
    pub fn page_count(&self, size: u32) -> u64 {
        if let Some(total_pages) = self.total_pages {
            return total_pages;
        }
        if size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(size))
    }
}
