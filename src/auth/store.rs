//! Persistent bearer-token storage.
//!
//! The service hands out an opaque bearer token on login; this store is the
//! single slot it lives in between runs. Presence of a token is the sole
//! authentication signal; there is no expiry check and no refresh. A stale
//! token simply produces 401s upstream.

use crate::types::Result;
use parking_lot::RwLock;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Single-slot token store backed by a file under the user config directory.
///
/// The token is cached in memory after the first read; `set` and `clear`
/// write through to disk. Overwritten on login, cleared on logout.
pub struct TokenStore {
    path: PathBuf,
    cached: RwLock<Option<String>>,
}

impl TokenStore {
    /// Opens a store at the given path, loading any previously saved token.
    pub fn open(path: PathBuf) -> Self {
        let cached = fs::read_to_string(&path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            path,
            cached: RwLock::new(cached),
        }
    }

    /// In-memory store that never touches disk. Used in tests and by callers
    /// that want a throwaway session.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            cached: RwLock::new(None),
        }
    }

    /// Returns the stored token, if any.
    pub fn get(&self) -> Option<String> {
        self.cached.read().clone()
    }

    /// Whether a token is present. Presence only, no validation.
    pub fn is_authenticated(&self) -> bool {
        self.cached.read().is_some()
    }

    /// Stores a token, replacing any previous one.
    pub fn set(&self, token: &str) -> Result<()> {
        *self.cached.write() = Some(token.to_string());
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        debug!(path = %self.path.display(), "stored auth token");
        Ok(())
    }

    /// Removes the stored token. Idempotent.
    pub fn clear(&self) -> Result<()> {
        *self.cached.write() = None;
        if self.path.as_os_str().is_empty() || !self.path.exists() {
            return Ok(());
        }
        fs::remove_file(&self.path)?;
        debug!(path = %self.path.display(), "cleared auth token");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> TokenStore {
        TokenStore::open(dir.path().join("token"))
    }

    #[test]
    fn test_empty_store_is_unauthenticated() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(!store.is_authenticated());
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_set_then_get() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.set("tok-abc").unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.get(), Some("tok-abc".to_string()));
    }

    #[test]
    fn test_set_overwrites_previous_token() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.set("first").unwrap();
        store.set("second").unwrap();
        assert_eq!(store.get(), Some("second".to_string()));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.set("tok").unwrap();
        store.clear().unwrap();
        assert!(!store.is_authenticated());
        // Clearing again must not fail
        store.clear().unwrap();
    }

    #[test]
    fn test_token_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token");

        TokenStore::open(path.clone()).set("persisted").unwrap();
        let reopened = TokenStore::open(path);
        assert_eq!(reopened.get(), Some("persisted".to_string()));
    }

    #[test]
    fn test_ephemeral_store_never_writes() {
        let store = TokenStore::ephemeral();
        store.set("tok").unwrap();
        assert!(store.is_authenticated());
        store.clear().unwrap();
        assert!(!store.is_authenticated());
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token");
        TokenStore::open(path.clone()).set("secret").unwrap();

        let mode = std::fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
