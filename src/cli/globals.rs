use crate::{
    api::{ApiClient, ClientConfig},
    session::FileSessionStore,
};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub session_file: Option<PathBuf>,
    pub json: bool,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            session_file: None,
            json: false,
        }
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(&ClientConfig::new(self.api_url.clone()))
            .with_context(|| format!("failed to create API client for {}", self.api_url))
    }

    /// # Errors
    /// Returns an error if no session file was given and no default location
    /// can be derived from the environment.
    pub fn store(&self) -> Result<FileSessionStore> {
        let path = match &self.session_file {
            Some(path) => path.clone(),
            None => FileSessionStore::default_path()
                .context("cannot locate the session file, pass --session-file")?,
        };
        Ok(FileSessionStore::new(path))
    }
}
