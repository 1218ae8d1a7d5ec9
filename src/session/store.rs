//! Single-slot storage for the session's bearer token.
//!
//! The [`ApiClient`](super::ApiClient) reads the token before every request
//! and replaces it after a refresh. Two stores are provided:
//!
//! - [`MemoryTokenStore`] keeps the token for the lifetime of the process.
//! - [`FileTokenStore`] persists it in a small JSON document under the key
//!   `accessToken`, so a CLI invocation can reuse the previous login. The
//!   backend's session cookie is kept in the same document under
//!   `sessionCookie`, since the refresh call proves the session with it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use marquee_common::{Error, Result};
use parking_lot::{Mutex, RwLock};

/// Key under which the access token is persisted.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Key under which the session cookie is persisted.
pub const SESSION_COOKIE_KEY: &str = "sessionCookie";

/// A mutable single-slot token holder shared by the client and its callers.
pub trait TokenStore: Send + Sync {
    /// Current token, if any.
    fn token(&self) -> Option<String>;

    /// Replace the stored token.
    fn set_token(&self, token: &str) -> Result<()>;

    /// Drop the stored token, and the session cookie if one is kept.
    fn clear(&self) -> Result<()>;

    /// Saved `Cookie` header value for the refresh call.
    ///
    /// Stores that live no longer than the client return `None`; the
    /// client's own cookie jar already holds the cookie.
    fn cookie(&self) -> Option<String> {
        None
    }

    /// Remember the `Cookie` header value for the refresh call.
    fn set_cookie(&self, _cookie: &str) -> Result<()> {
        Ok(())
    }
}

/// In-memory token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.slot.read().clone()
    }

    fn set_token(&self, token: &str) -> Result<()> {
        *self.slot.write() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.write() = None;
        Ok(())
    }
}

/// Token store backed by a JSON key-value file.
///
/// The file is read on every [`TokenStore::token`] call so that several
/// processes sharing the file observe each other's logins. A missing or
/// unreadable file means "no token". Other keys in the document are kept.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, doc: &BTreeMap<String, serde_json::Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            Error::storage(format!("failed to replace {}: {e}", self.path.display()))
        })
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.read_document() {
            Ok(doc) => doc
                .get(key)
                .and_then(|v| v.as_str())
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Ignoring unreadable token file: {}",
                    e
                );
                None
            }
        }
    }

    fn write_key(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut doc = self.read_document().unwrap_or_default();
        doc.insert(key.to_string(), serde_json::Value::String(value.to_string()));
        self.write_document(&doc)
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        self.read_key(ACCESS_TOKEN_KEY)
    }

    fn set_token(&self, token: &str) -> Result<()> {
        self.write_key(ACCESS_TOKEN_KEY, token)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut doc = self.read_document().unwrap_or_default();
        let removed_token = doc.remove(ACCESS_TOKEN_KEY).is_some();
        let removed_cookie = doc.remove(SESSION_COOKIE_KEY).is_some();
        if !removed_token && !removed_cookie && !self.path.exists() {
            return Ok(());
        }
        self.write_document(&doc)
    }

    fn cookie(&self) -> Option<String> {
        self.read_key(SESSION_COOKIE_KEY)
    }

    fn set_cookie(&self, cookie: &str) -> Result<()> {
        self.write_key(SESSION_COOKIE_KEY, cookie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_store_lifecycle() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.token(), None);

        store.set_token("t1").unwrap();
        assert_eq!(store.token().as_deref(), Some("t1"));

        store.set_token("t2").unwrap();
        assert_eq!(store.token().as_deref(), Some("t2"));

        store.clear().unwrap();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn file_store_missing_file_has_no_token() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));
        assert_eq!(store.token(), None);
        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn file_store_persists_under_access_token_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileTokenStore::new(&path);

        store.set_token("abc").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["accessToken"], "abc");

        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.token().as_deref(), Some("abc"));
    }

    #[test]
    fn file_store_clear_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"accessToken":"abc","theme":"dark"}"#).unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.token().as_deref(), Some("abc"));

        store.clear().unwrap();
        assert_eq!(store.token(), None);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert!(raw.get("accessToken").is_none());
    }

    #[test]
    fn file_store_ignores_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.token(), None);

        store.set_token("fresh").unwrap();
        assert_eq!(store.token().as_deref(), Some("fresh"));
    }

    #[test]
    fn file_store_keeps_cookie_beside_token() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileTokenStore::new(&path);

        store.set_token("abc").unwrap();
        store.set_cookie("refreshToken=r-1").unwrap();

        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.token().as_deref(), Some("abc"));
        assert_eq!(reopened.cookie().as_deref(), Some("refreshToken=r-1"));

        reopened.clear().unwrap();
        assert_eq!(store.token(), None);
        assert_eq!(store.cookie(), None);
    }

    #[test]
    fn memory_store_does_not_keep_cookies() {
        let store = MemoryTokenStore::with_token("t");
        store.set_cookie("refreshToken=r-1").unwrap();
        assert_eq!(store.cookie(), None);
    }
}
