//! Persistence media for the session credential.
//!
//! # Design
//! The credential lives under a single key (`TOKEN_KEY`) in a small
//! key-value medium that survives process restarts. `FileTokenStorage`
//! keeps a JSON object on disk and preserves keys it does not own, the same
//! way a settings file is rewritten without clobbering foreign entries.
//! Nothing is encrypted at rest.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::SessionError;

/// Key under which the credential is stored.
pub const TOKEN_KEY: &str = "token";

/// Key-addressed storage for the opaque session token.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>, SessionError>;
    fn save(&self, token: &str) -> Result<(), SessionError>;
    fn remove(&self) -> Result<(), SessionError>;
}

/// Token stored in a JSON object file, e.g. `{"token": "..."}`.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, serde_json::Value>, SessionError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_entries(
        &self,
        entries: &BTreeMap<String, serde_json::Value>,
    ) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>, SessionError> {
        let entries = self.read_entries()?;
        Ok(entries
            .get(TOKEN_KEY)
            .and_then(|v| v.as_str())
            .filter(|token| !token.is_empty())
            .map(str::to_string))
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        let mut entries = self.read_entries()?;
        entries.insert(
            TOKEN_KEY.to_string(),
            serde_json::Value::String(token.to_string()),
        );
        self.write_entries(&entries)
    }

    fn remove(&self) -> Result<(), SessionError> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut entries = self.read_entries()?;
        if entries.remove(TOKEN_KEY).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// Process-local medium; nothing outlives the value.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), SessionError> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("session.json"));
        assert_eq!(storage.load().unwrap(), None);
        storage.remove().unwrap();
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let storage = FileTokenStorage::new(&path);
        storage.save("tok123").unwrap();
        assert!(path.exists());
        assert_eq!(storage.load().unwrap().as_deref(), Some("tok123"));
    }

    #[test]
    fn remove_preserves_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"theme":"dark","token":"old"}"#).unwrap();

        let storage = FileTokenStorage::new(&path);
        assert_eq!(storage.load().unwrap().as_deref(), Some("old"));
        storage.remove().unwrap();
        assert_eq!(storage.load().unwrap(), None);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"theme": "dark"}));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        let err = FileTokenStorage::new(&path).load().unwrap_err();
        assert!(matches!(err, SessionError::Format(_)));
    }

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryTokenStorage::with_token("abc");
        assert_eq!(storage.load().unwrap().as_deref(), Some("abc"));
        storage.remove().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }
}
