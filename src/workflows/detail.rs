//! Single code view: metadata plus its own paged usage records.

use crate::{
    api::{ApiClient, ApiError, Page},
    features::codes::{client, CodeId, InviteCode, UsageQuery, UsageRecord},
    session::Session,
    workflows::{
        loading::LoadingGate,
        toggle::{self, Decision, ToggleIntent, ToggleOutcome},
    },
};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CodeDetailView {
    id: CodeId,
    code: Option<InviteCode>,
    records: Option<Page<UsageRecord>>,
    records_query: UsageQuery,
    gate: LoadingGate,
}

impl CodeDetailView {
    #[must_use]
    pub fn new(id: CodeId) -> Self {
        Self {
            id,
            code: None,
            records: None,
            records_query: UsageQuery::default(),
            gate: LoadingGate::new(),
        }
    }

    /// Start the usage record list at `query` instead of the first page.
    #[must_use]
    pub fn with_records_query(mut self, query: UsageQuery) -> Self {
        self.records_query = query;
        self
    }

    #[must_use]
    pub fn id(&self) -> &CodeId {
        &self.id
    }

    #[must_use]
    pub fn code(&self) -> Option<&InviteCode> {
        self.code.as_ref()
    }

    #[must_use]
    pub fn records(&self) -> &[UsageRecord] {
        self.records
            .as_ref()
            .map(|page| page.content.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn records_query(&self) -> &UsageQuery {
        &self.records_query
    }

    #[must_use]
    pub fn records_total(&self) -> u64 {
        self.records.as_ref().map_or(0, |page| page.total_elements)
    }

    #[must_use]
    pub fn gate(&self) -> &LoadingGate {
        &self.gate
    }

    /// Load the code and its first page of usage records.
    ///
    /// # Errors
    /// Any [`ApiError`] from either call.
    pub async fn load(&mut self, api: &ApiClient, session: &Session) -> Result<(), ApiError> {
        self.refresh_code(api, session).await?;
        self.refresh_records(api, session).await
    }

    /// Re-fetch the code's metadata only.
    ///
    /// # Errors
    /// `Busy` while another load is in flight, or any [`ApiError`].
    pub async fn refresh_code(
        &mut self,
        api: &ApiClient,
        session: &Session,
    ) -> Result<(), ApiError> {
        let _in_flight = self.gate.try_begin()?;
        let code = client::get(api, session, &self.id).await?;
        debug!(id = %self.id, active = code.active, "code detail loaded");
        self.code = Some(code);
        Ok(())
    }

    /// Re-fetch the usage records for the current records query.
    ///
    /// # Errors
    /// `Busy` while another load is in flight, or any [`ApiError`].
    pub async fn refresh_records(
        &mut self,
        api: &ApiClient,
        session: &Session,
    ) -> Result<(), ApiError> {
        let query = self.records_query;
        self.fetch_records(api, session, query).await
    }

    /// Move the usage record list to `page`, keeping its size.
    ///
    /// # Errors
    /// See [`Self::refresh_records`]. The records query only changes once the
    /// page has loaded.
    pub async fn records_goto(
        &mut self,
        api: &ApiClient,
        session: &Session,
        page: u32,
    ) -> Result<(), ApiError> {
        let query = UsageQuery {
            page,
            ..self.records_query
        };
        self.fetch_records(api, session, query).await
    }

    async fn fetch_records(
        &mut self,
        api: &ApiClient,
        session: &Session,
        query: UsageQuery,
    ) -> Result<(), ApiError> {
        let _in_flight = self.gate.try_begin()?;
        let records = client::usage_records(api, session, &self.id, &query).await?;
        debug!(
            id = %self.id,
            page = query.page,
            returned = records.content.len(),
            total = records.total_elements,
            "usage records loaded"
        );
        self.records_query = query;
        self.records = Some(records);
        Ok(())
    }

    /// Offer to flip the loaded code.
    ///
    /// # Errors
    /// `Validation` before the code has been loaded.
    pub fn request_toggle(&self) -> Result<ToggleIntent, ApiError> {
        self.code
            .as_ref()
            .map(ToggleIntent::for_code)
            .ok_or_else(|| ApiError::Validation("Invite code is not loaded yet".to_string()))
    }

    /// Resolve `intent` and, when it was applied, re-fetch the code.
    ///
    /// # Errors
    /// Any [`ApiError`] from the toggle or the re-fetch.
    pub async fn resolve_toggle(
        &mut self,
        api: &ApiClient,
        session: &Session,
        intent: ToggleIntent,
        decision: Decision,
    ) -> Result<ToggleOutcome, ApiError> {
        let outcome = {
            let _in_flight = self.gate.try_begin()?;
            toggle::resolve(api, session, intent, decision).await?
        };
        if outcome.is_applied() {
            self.refresh_code(api, session).await?;
        }
        Ok(outcome)
    }
}
