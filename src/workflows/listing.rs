//! Paged code listing. The view remembers the query in effect so that page
//! moves keep size and ordering, and it reloads after every mutation.

use crate::{
    api::{ApiClient, ApiError, Page},
    features::codes::{client, CodeId, CodeQuery, InviteCode, SortDirection, SortField},
    session::Session,
    workflows::{
        loading::LoadingGate,
        toggle::{self, Decision, ToggleIntent, ToggleOutcome},
    },
};
use tracing::debug;

/// What the page controls show. `page` and `size` are the requested ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, Default)]
pub struct CodeListView {
    query: CodeQuery,
    page: Option<Page<InviteCode>>,
    gate: LoadingGate,
}

impl CodeListView {
    #[must_use]
    pub fn new(query: CodeQuery) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn query(&self) -> &CodeQuery {
        &self.query
    }

    #[must_use]
    pub fn gate(&self) -> &LoadingGate {
        &self.gate
    }

    #[must_use]
    pub fn codes(&self) -> &[InviteCode] {
        self.page
            .as_ref()
            .map(|page| page.content.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn page_info(&self) -> PageInfo {
        let total_elements = self.page.as_ref().map_or(0, |page| page.total_elements);
        PageInfo {
            page: self.query.page,
            size: self.query.size,
            total_elements,
            total_pages: self
                .page
                .as_ref()
                .map_or(0, |page| page.page_count(self.query.size)),
        }
    }

    /// Fetch the page described by the current query.
    ///
    /// # Errors
    /// `Busy` while a load is in flight, or any [`ApiError`] from the call.
    /// The previously loaded page is kept on error.
    pub async fn reload(&mut self, api: &ApiClient, session: &Session) -> Result<(), ApiError> {
        let query = self.query;
        self.fetch(api, session, query).await
    }

    /// Move to `page`, keeping size and sort.
    ///
    /// # Errors
    /// See [`Self::reload`]. The query in effect only changes once the page
    /// has loaded.
    pub async fn goto_page(
        &mut self,
        api: &ApiClient,
        session: &Session,
        page: u32,
    ) -> Result<(), ApiError> {
        let query = CodeQuery { page, ..self.query };
        self.fetch(api, session, query).await
    }

    /// Change the page size and go back to the first page.
    ///
    /// # Errors
    /// `Validation` for a zero size, otherwise see [`Self::goto_page`].
    pub async fn set_page_size(
        &mut self,
        api: &ApiClient,
        session: &Session,
        size: u32,
    ) -> Result<(), ApiError> {
        if size == 0 {
            return Err(ApiError::Validation("Page size must be at least 1".to_string()));
        }
        let query = CodeQuery {
            page: 0,
            size,
            ..self.query
        };
        self.fetch(api, session, query).await
    }

    /// Change ordering and go back to the first page.
    ///
    /// # Errors
    /// See [`Self::goto_page`].
    pub async fn set_sort(
        &mut self,
        api: &ApiClient,
        session: &Session,
        sort_by: SortField,
        direction: SortDirection,
    ) -> Result<(), ApiError> {
        let query = CodeQuery {
            page: 0,
            sort_by,
            direction,
            ..self.query
        };
        self.fetch(api, session, query).await
    }

    /// Load `query` and make it current together with its page.
    async fn fetch(
        &mut self,
        api: &ApiClient,
        session: &Session,
        query: CodeQuery,
    ) -> Result<(), ApiError> {
        let _in_flight = self.gate.try_begin()?;
        let page = client::list(api, session, &query).await?;
        debug!(
            page = query.page,
            returned = page.content.len(),
            total = page.total_elements,
            "code list loaded"
        );
        self.query = query;
        self.page = Some(page);
        Ok(())
    }

    /// Offer to flip the code `id` from the loaded page.
    ///
    /// # Errors
    /// `Validation` when the code is not on the loaded page.
    pub fn request_toggle(&self, id: &CodeId) -> Result<ToggleIntent, ApiError> {
        self.codes()
            .iter()
            .find(|code| &code.id == id)
            .map(ToggleIntent::for_code)
            .ok_or_else(|| ApiError::Validation(format!("Invite code {id} is not on this page")))
    }

    /// Resolve `intent` and, when it was applied, reload the current page.
    ///
    /// # Errors
    /// Any [`ApiError`] from the toggle or the reload.
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
            self.reload(api, session).await?;
        }
        Ok(outcome)
    }
}
