//! Durable local session storage
//!
//! The store keeps the authentication token and the serialized user record
//! as two files under one directory, mirroring the `finhero-token` /
//! `finhero-user` keys of the browser client. A session is either fully
//! present (both files readable) or absent; `set` and `clear` maintain that
//! invariant.

pub mod error;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub use error::{StoreError, StoreResult};

/// File name holding the raw authentication token
pub const TOKEN_FILE: &str = "finhero-token";
/// File name holding the JSON-serialized user record
pub const USER_FILE: &str = "finhero-user";

/// A fully hydrated session read back from disk
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession<T> {
    /// Opaque backend-issued token
    pub token: String,
    /// Deserialized user record
    pub user: T,
}

/// File-backed session store
///
/// Sole designated writer of the storage directory; callers own one instance
/// for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at the given directory
    ///
    /// The directory is created lazily on the first `set`.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE)
    }

    /// Read the session from disk, if one is present
    ///
    /// Pure read: no files are created or modified. Returns `None` unless
    /// both the token and the user record exist; a user record that exists
    /// but does not deserialize is reported as [`StoreError::Corrupt`].
    pub fn hydrate<T: DeserializeOwned>(&self) -> StoreResult<Option<StoredSession<T>>> {
        let token = match read_if_present(&self.token_path())? {
            Some(token) => token,
            None => return Ok(None),
        };
        let user_json = match read_if_present(&self.user_path())? {
            Some(json) => json,
            None => {
                warn!("session token present without a user record; treating as absent");
                return Ok(None);
            }
        };

        let token = token.trim().to_string();
        if token.is_empty() {
            return Ok(None);
        }

        let user = serde_json::from_str(&user_json).map_err(|e| StoreError::Corrupt {
            path: self.user_path().to_string_lossy().to_string(),
            reason: e.to_string(),
        })?;

        debug!("hydrated session from {}", self.dir.display());
        Ok(Some(StoredSession { token, user }))
    }

    /// Persist the token and user record together
    ///
    /// Both writes go through a temporary file and a rename. If the second
    /// rename fails the first is rolled back, so from the caller's
    /// perspective the pair either lands completely or not at all.
    pub fn set<T: Serialize>(&self, token: &str, user: &T) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let user_json = serde_json::to_string(user).map_err(|e| StoreError::Serialize {
            reason: e.to_string(),
        })?;

        write_atomic(&self.token_path(), token)?;
        if let Err(e) = write_atomic(&self.user_path(), &user_json) {
            // Roll back the token so no half-written session survives
            let _ = fs::remove_file(self.token_path());
            return Err(e);
        }

        debug!("session persisted to {}", self.dir.display());
        Ok(())
    }

    /// Remove the token and user record
    ///
    /// Idempotent: clearing an absent session is not an error.
    pub fn clear(&self) -> StoreResult<()> {
        remove_if_present(&self.token_path())?;
        remove_if_present(&self.user_path())?;
        debug!("session cleared from {}", self.dir.display());
        Ok(())
    }
}

fn read_if_present(path: &Path) -> StoreResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

fn write_atomic(path: &Path, content: &str) -> StoreResult<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))
}

fn remove_if_present(path: &Path) -> StoreResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestUser {
        id: String,
        name: String,
        email: String,
    }

    fn sample_user() -> TestUser {
        TestUser {
            id: "u-1".to_string(),
            name: "Maria".to_string(),
            email: "maria@example.com".to_string(),
        }
    }

    static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    fn temp_store() -> SessionStore {
        let seq = DIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "finhero-store-test-{}-{}",
            std::process::id(),
            seq
        ));
        let _ = fs::remove_dir_all(&dir);
        SessionStore::new(dir)
    }

    #[test]
    fn test_hydrate_empty_store() {
        let store = temp_store();
        let session: Option<StoredSession<TestUser>> = store.hydrate().unwrap();
        assert!(session.is_none());
    }

    #[test]
    fn test_set_then_hydrate() {
        let store = temp_store();
        store.set("tok-123", &sample_user()).unwrap();

        let session: StoredSession<TestUser> = store.hydrate().unwrap().unwrap();
        assert_eq!(session.token, "tok-123");
        assert_eq!(session.user, sample_user());
    }

    #[test]
    fn test_clear_removes_both() {
        let store = temp_store();
        store.set("tok-123", &sample_user()).unwrap();
        store.clear().unwrap();

        let session: Option<StoredSession<TestUser>> = store.hydrate().unwrap();
        assert!(session.is_none());
        // Clearing again is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_token_without_user_is_absent() {
        let store = temp_store();
        store.set("tok-123", &sample_user()).unwrap();
        fs::remove_file(store.user_path()).unwrap();

        let session: Option<StoredSession<TestUser>> = store.hydrate().unwrap();
        assert!(session.is_none());
    }

    #[test]
    fn test_corrupt_user_record() {
        let store = temp_store();
        store.set("tok-123", &sample_user()).unwrap();
        fs::write(store.user_path(), "not json").unwrap();

        let result: StoreResult<Option<StoredSession<TestUser>>> = store.hydrate();
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_failed_set_rolls_back_token() {
        let store = temp_store();
        // A directory squatting on the temp path makes the user write fail
        fs::create_dir_all(store.user_path().with_extension("tmp")).unwrap();

        let result = store.set("tok-123", &sample_user());
        assert!(matches!(result, Err(StoreError::Io { .. })));

        // The token written before the failure must not survive alone
        assert!(!store.token_path().exists());
        let session: Option<StoredSession<TestUser>> = store.hydrate().unwrap();
        assert!(session.is_none());
    }

    #[test]
    fn test_set_overwrites_previous_session() {
        let store = temp_store();
        store.set("tok-old", &sample_user()).unwrap();

        let other = TestUser {
            id: "u-2".to_string(),
            name: "João".to_string(),
            email: "joao@example.com".to_string(),
        };
        store.set("tok-new", &other).unwrap();

        let session: StoredSession<TestUser> = store.hydrate().unwrap().unwrap();
        assert_eq!(session.token, "tok-new");
        assert_eq!(session.user.id, "u-2");
    }
}
