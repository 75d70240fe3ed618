//! At most one request in flight per user action.

use crate::api::ApiError;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Loading indicator shared between a workflow and whoever renders it.
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct LoadingGate {
    busy: Arc<AtomicBool>,
}

impl LoadingGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the gate for the duration of one request.
    ///
    /// # Errors
    /// [`ApiError::Busy`] if another request already holds it.
    pub fn try_begin(&self) -> Result<InFlight, ApiError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ApiError::Busy)?;

        Ok(InFlight {
            busy: Arc::clone(&self.busy),
        })
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the gate when dropped, on success and error paths alike.
#[derive(Debug)]
pub struct InFlight {
    busy: Arc<AtomicBool>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
