//! Bearer-token session state.
//!
//! The session is an explicit object passed into the [`ApiClient`]
//! constructor rather than ambient global credential storage. Its lifecycle
//! is init-on-login, teardown-on-logout or on an authentication rejection.
//!
//! [`ApiClient`]: super::ApiClient

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Holds the bearer token for authenticated API calls.
///
/// When constructed with a store path the token survives restarts: it is
/// written to a single well-known file and loaded back on construction.
/// An absent token means unauthenticated.
#[derive(Debug)]
pub struct Session {
    token: Mutex<Option<String>>,
    store: Option<PathBuf>,
}

impl Session {
    /// Create an in-memory session with no token.
    pub fn new() -> Self {
        Self {
            token: Mutex::new(None),
            store: None,
        }
    }

    /// Create a session backed by a token file.
    ///
    /// If the file exists its contents become the current token.
    pub fn with_store<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let token = fs::read_to_string(&path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            token: Mutex::new(token),
            store: Some(path),
        }
    }

    /// The current bearer token, if authenticated.
    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.lock().unwrap().is_some()
    }

    /// Store a new token, persisting it if a store path is configured.
    pub fn set_token(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
        if let Some(path) = &self.store {
            if let Err(e) = fs::write(path, token) {
                tracing::warn!(path = %path.display(), error = %e, "failed to persist token");
            }
        }
    }

    /// Drop the token, removing the persisted copy if present.
    ///
    /// Called on logout and whenever the server rejects the credential.
    pub fn clear(&self) {
        *self.token.lock().unwrap() = None;
        if let Some(path) = &self.store {
            let _ = fs::remove_file(path);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_session_is_unauthenticated() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_set_and_clear_token() {
        let session = Session::new();
        session.set_token("abc123");
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("abc123"));

        session.clear();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_token_persists_across_sessions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token");

        let session = Session::with_store(&path);
        assert!(!session.is_authenticated());
        session.set_token("persisted-token");

        // A fresh session over the same store picks the token up
        let reloaded = Session::with_store(&path);
        assert_eq!(reloaded.token().as_deref(), Some("persisted-token"));
    }

    #[test]
    fn test_clear_removes_persisted_token() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token");

        let session = Session::with_store(&path);
        session.set_token("short-lived");
        session.clear();

        assert!(!path.exists());
        let reloaded = Session::with_store(&path);
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn test_empty_store_file_means_unauthenticated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "\n").unwrap();

        let session = Session::with_store(&path);
        assert!(!session.is_authenticated());
    }
}
