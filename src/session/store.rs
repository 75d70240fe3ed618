//! Durable session storage.
//!
//! The file store keeps one JSON document at a fixed path. It survives
//! restarts and is removed only by logout or when the server rejects the
//! token. On Unix the file is created with mode `0600`.

use super::Session;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};
use thiserror::Error;
use tracing::debug;

const SESSION_DIR: &str = "invite-console";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is malformed: {0}")]
    Format(#[from] serde_json::Error),
    #[error("session storage lock poisoned")]
    Poisoned,
    #[error("no location for the session file: set XDG_CONFIG_HOME or HOME")]
    NoLocation,
}

pub trait SessionStore: Send + Sync {
    /// Load the stored session, or a logged-out one when nothing is stored.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read or is malformed.
    fn load(&self) -> Result<Session, StoreError>;

    /// Persist `session`, replacing whatever was stored.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be written.
    fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Forget the stored session. Clearing an empty store succeeds.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be modified.
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
}

impl StoredSession {
    fn from_session(session: &Session) -> Option<Self> {
        session.token().map(|token| Self {
            token: token.expose_secret().to_string(),
            username: session.username().map(ToString::to_string),
            roles: session.roles().to_vec(),
        })
    }

    fn into_session(self) -> Session {
        Session::authenticated(SecretString::from(self.token), self.username, self.roles)
    }
}

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_CONFIG_HOME/invite-console/session.json`, falling back to
    /// `$HOME/.config/invite-console/session.json`.
    ///
    /// # Errors
    /// Returns an error when neither variable is set.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME")
                    .filter(|value| !value.is_empty())
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .ok_or(StoreError::NoLocation)?;

        Ok(base.join(SESSION_DIR).join(SESSION_FILE))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Session, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no session file at {}", self.path.display());
                return Ok(Session::anonymous());
            }
            Err(err) => return Err(err.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Session::anonymous());
        }

        let stored: StoredSession = serde_json::from_str(&raw)?;
        Ok(stored.into_session())
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let Some(stored) = StoredSession::from_session(session) else {
            return self.clear();
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let payload = serde_json::to_vec_pretty(&stored)?;
        let mut file = open_private(&self.path)?;
        file.write_all(&payload)?;
        file.flush()?;

        debug!("session saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("session file {} removed", self.path.display());
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on create
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// In-process store, used by tests and embedders that manage persistence
/// themselves.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Session>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Session, StoreError> {
        self.session
            .lock()
            .map(|session| session.clone())
            .map_err(|_| StoreError::Poisoned)
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let mut guard = self.session.lock().map_err(|_| StoreError::Poisoned)?;
        *guard = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.session.lock().map_err(|_| StoreError::Poisoned)?;
        *guard = Session::anonymous();
        Ok(())
    }
}
