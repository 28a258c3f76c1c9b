use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Persisted session record. Field names match the keys the web client kept
/// in browser storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub username: String,
    #[serde(rename = "authToken")]
    pub auth_token: String,
    /// Informational only; sessions never expire client-side
    pub created_at: DateTime<Utc>,
}

/// The one place session state is read and written.
///
/// Two stores are kept in step: the in-memory record every screen reads, and
/// the session file that survives restarts. `clear` empties both.
#[derive(Debug)]
pub struct SessionStore {
    dir: Option<PathBuf>,
    data: Option<SessionData>,
}

impl SessionStore {
    /// Store persisted under `dir`
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir: Some(dir),
            data: None,
        }
    }

    /// Store with no file backing
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            data: None,
        }
    }

    /// Load session from disk. Returns true if a session was found.
    pub fn load(&mut self) -> Result<bool> {
        let Some(path) = self.session_path() else {
            return Ok(false);
        };
        if !path.exists() {
            return Ok(false);
        }

        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let data: SessionData =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        debug!(username = %data.username, "Session restored");
        self.data = Some(data);
        Ok(true)
    }

    /// Record a successful login and persist it. The token is stored as
    /// received; a server that issues none leaves it empty.
    ///
    /// Nothing changes in memory unless the file was written.
    pub fn establish(&mut self, username: &str, token: Option<&str>) -> Result<()> {
        let data = SessionData {
            username: username.to_string(),
            auth_token: token.unwrap_or_default().to_string(),
            created_at: Utc::now(),
        };
        self.save(&data)?;
        self.data = Some(data);
        info!(username, "Session established");
        Ok(())
    }

    fn save(&self, data: &SessionData) -> Result<()> {
        let Some(path) = self.session_path() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(&path, contents).context("Failed to write session file")?;
        Ok(())
    }

    /// Drop the session from memory and from disk
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        if let Some(path) = self.session_path() {
            if path.exists() {
                std::fs::remove_file(&path).context("Failed to remove session file")?;
            }
        }
        info!("Session cleared");
        Ok(())
    }

    pub fn data(&self) -> Option<&SessionData> {
        self.data.as_ref()
    }

    /// Get the bearer token if the session has one
    pub fn token(&self) -> Option<&str> {
        self.data
            .as_ref()
            .map(|d| d.auth_token.as_str())
            .filter(|t| !t.is_empty())
    }

    pub fn username(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.username.as_str())
    }

    /// Whether authenticated screens may be shown: a session record exists,
    /// with or without a token
    pub fn is_valid(&self) -> bool {
        self.data.is_some()
    }

    fn session_path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.join(SESSION_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_not_valid() {
        let store = SessionStore::in_memory();
        assert!(!store.is_valid());
        assert!(store.token().is_none());
        assert!(store.username().is_none());
    }

    #[test]
    fn test_establish_persists_token_and_username() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::new(dir.path().to_path_buf());
        store.establish("alice", Some("tok-123")).unwrap();

        assert!(store.is_valid());
        assert_eq!(store.token(), Some("tok-123"));
        assert_eq!(store.username(), Some("alice"));

        let raw = std::fs::read_to_string(dir.path().join(SESSION_FILE)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["authToken"], "tok-123");
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_load_restores_session() {
        let dir = tempfile::tempdir().unwrap();
        SessionStore::new(dir.path().to_path_buf())
            .establish("bob", Some("tok-456"))
            .unwrap();

        let mut restored = SessionStore::new(dir.path().to_path_buf());
        assert!(restored.load().unwrap());
        assert_eq!(restored.username(), Some("bob"));
        assert_eq!(restored.token(), Some("tok-456"));
    }

    #[test]
    fn test_load_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::new(dir.path().to_path_buf());
        assert!(!store.load().unwrap());
        assert!(!store.is_valid());
    }

    #[test]
    fn test_load_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "not json").unwrap();
        let mut store = SessionStore::new(dir.path().to_path_buf());
        assert!(store.load().is_err());
        assert!(!store.is_valid());
    }

    #[test]
    fn test_clear_removes_both_stores() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::new(dir.path().to_path_buf());
        store.establish("alice", Some("tok-123")).unwrap();

        store.clear().unwrap();
        assert!(!store.is_valid());
        assert!(store.data().is_none());
        assert!(!dir.path().join(SESSION_FILE).exists());

        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_tokenless_session_is_valid_without_bearer() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::new(dir.path().to_path_buf());
        store.establish("alice", None).unwrap();

        assert!(store.is_valid());
        assert_eq!(store.username(), Some("alice"));
        assert!(store.token().is_none());

        let raw = std::fs::read_to_string(dir.path().join(SESSION_FILE)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["authToken"], "");
        assert_eq!(json["username"], "alice");

        let mut restored = SessionStore::new(dir.path().to_path_buf());
        assert!(restored.load().unwrap());
        assert!(restored.is_valid());
        assert!(restored.token().is_none());
    }

    #[test]
    fn test_failed_write_leaves_store_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the session directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let mut store = SessionStore::new(blocker.join("certvault"));

        assert!(store.establish("alice", Some("tok-123")).is_err());
        assert!(!store.is_valid());
        assert!(store.username().is_none());
    }
}
