//! Session store: the single source of truth for "is authenticated".
//!
//! # Design
//! A `Session` owns the current credential and the medium it is persisted
//! in. It is created once at startup and shared as `Arc<Session>` with the
//! request pipeline, which only ever reads it. Writes happen on explicit
//! login and logout. The medium is written first so memory never claims a
//! credential that would not survive a restart.

use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::SessionError;
use crate::storage::TokenStorage;

/// Opaque bearer token identifying an authenticated session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A blank token counts as no credential at all.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Value of the `authorization` header carrying this credential.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

pub struct Session {
    storage: Box<dyn TokenStorage>,
    credential: RwLock<Option<Credential>>,
}

impl Session {
    /// Opens a session over `storage`, restoring any persisted credential.
    pub fn open(storage: Box<dyn TokenStorage>) -> Result<Self, SessionError> {
        let credential = storage
            .load()?
            .map(Credential::new)
            .filter(|credential| !credential.is_blank());
        tracing::debug!(restored = credential.is_some(), "session opened");
        Ok(Self {
            storage,
            credential: RwLock::new(credential),
        })
    }

    pub fn credential(&self) -> Option<Credential> {
        self.read().clone()
    }

    /// Stores `credential`. A blank one logs out instead, so memory and the
    /// medium agree after a restart.
    pub fn set_credential(&self, credential: Credential) -> Result<(), SessionError> {
        if credential.is_blank() {
            return self.clear_credential();
        }
        self.storage.save(credential.as_str())?;
        *self.write() = Some(credential);
        tracing::info!("session credential stored");
        Ok(())
    }

    pub fn clear_credential(&self) -> Result<(), SessionError> {
        self.storage.remove()?;
        *self.write() = None;
        tracing::info!("session credential cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Credential>> {
        self.credential
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Credential>> {
        self.credential
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileTokenStorage, MemoryTokenStorage};

    #[test]
    fn empty_storage_is_unauthenticated() {
        let session = Session::open(Box::new(MemoryTokenStorage::new())).unwrap();
        assert!(!session.is_authenticated());
        assert!(session.credential().is_none());
    }

    #[test]
    fn persisted_token_is_restored() {
        let session = Session::open(Box::new(MemoryTokenStorage::with_token("tok123"))).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.credential().unwrap().as_str(), "tok123");
    }

    #[test]
    fn login_then_logout_restores_unauthenticated_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = Session::open(Box::new(FileTokenStorage::new(&path))).unwrap();
        let before = session.is_authenticated();

        session.set_credential(Credential::new("tok123")).unwrap();
        assert!(session.is_authenticated());

        session.clear_credential().unwrap();
        assert_eq!(session.is_authenticated(), before);
        assert_eq!(FileTokenStorage::new(&path).load().unwrap(), None);
    }

    #[test]
    fn credential_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        Session::open(Box::new(FileTokenStorage::new(&path)))
            .unwrap()
            .set_credential(Credential::new("persisted"))
            .unwrap();

        let reopened = Session::open(Box::new(FileTokenStorage::new(&path))).unwrap();
        assert_eq!(reopened.credential().unwrap().as_str(), "persisted");
    }

    #[test]
    fn blank_credential_is_not_authenticated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = Session::open(Box::new(FileTokenStorage::new(&path))).unwrap();
        session.set_credential(Credential::new("tok123")).unwrap();

        session.set_credential(Credential::new("")).unwrap();
        assert!(!session.is_authenticated());

        let reopened = Session::open(Box::new(FileTokenStorage::new(&path))).unwrap();
        assert_eq!(reopened.is_authenticated(), session.is_authenticated());
    }

    #[test]
    fn blank_stored_token_is_ignored() {
        let session = Session::open(Box::new(MemoryTokenStorage::with_token("  "))).unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn credential_debug_hides_token() {
        let credential = Credential::new("tok123");
        assert!(!format!("{credential:?}").contains("tok123"));
        assert_eq!(credential.bearer(), "Bearer tok123");
    }
}
