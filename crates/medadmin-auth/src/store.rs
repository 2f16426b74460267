//! Persistent token storage.
//!
//! The session keeps exactly two opaque strings under fixed keys:
//! [`ACCESS_TOKEN_KEY`] and [`REFRESH_TOKEN_KEY`]. Writes go through
//! [`TokenStore::set`] and [`TokenStore::remove`], which take every affected
//! key at once so the pair is always updated together.
//!
//! # File Format
//!
//! [`FileTokenStore`] keeps the pair as a small JSON object:
//!
//! ```json
//! {
//!   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "refreshToken": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
//! }
//! ```
//!
//! The file is written to a temporary sibling and renamed into place, with
//! permissions 0600 on Unix.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

/// Storage key for the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "token";
/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Error type for token storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to write token file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove token file '{path}': {source}")]
    Remove {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize tokens: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key/value storage for session tokens.
pub trait TokenStore: Send + Sync {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores every entry in one write.
    fn set(&self, entries: &[(&str, &str)]) -> Result<(), StoreError>;

    /// Removes every key in one write.
    fn remove(&self, keys: &[&str]) -> Result<(), StoreError>;
}

/// Access and refresh token returned by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-process token storage. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with a token pair.
    pub fn with_tokens(access_token: &str, refresh_token: Option<&str>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(ACCESS_TOKEN_KEY.to_string(), access_token.to_string());
        if let Some(refresh) = refresh_token {
            entries.insert(REFRESH_TOKEN_KEY.to_string(), refresh.to_string());
        }
        Self {
            entries: Mutex::new(entries),
        }
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut map = lock(&self.entries);
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut map = lock(&self.entries);
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

/// Token storage backed by a JSON file.
///
/// The file is read once when the store is opened; afterwards the in-memory
/// cache is authoritative and every change is written through.
#[derive(Debug)]
pub struct FileTokenStore {
    file_path: PathBuf,
    cache: Mutex<BTreeMap<String, String>>,
}

impl FileTokenStore {
    /// Opens the store at `file_path`.
    ///
    /// A missing file is an empty store. An unreadable or corrupted file is
    /// logged and also treated as empty; it is replaced on the next write.
    pub fn open(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        let cache = Self::load_from_disk(&file_path);
        Self {
            file_path,
            cache: Mutex::new(cache),
        }
    }

    pub fn from_config(config: &medadmin_config::SessionConfig) -> Self {
        Self::open(config.token_file.clone())
    }

    /// Get the file path used by this store
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_disk(path: &Path) -> BTreeMap<String, String> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read token file, starting signed out");
                return BTreeMap::new();
            }
        };

        match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupted token file, starting signed out");
                BTreeMap::new()
            }
        }
    }

    fn save_to_disk(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let path_display = self.file_path.display().to_string();

        if entries.is_empty() {
            return match fs::remove_file(&self.file_path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(source) => Err(StoreError::Remove {
                    path: path_display,
                    source,
                }),
            };
        }

        let contents = serde_json::to_string_pretty(entries)?;
        let write_err = |source| StoreError::Write {
            path: path_display.clone(),
            source,
        };

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let tmp_path = self
            .file_path
            .with_extension(format!("tmp-{}", uuid::Uuid::new_v4().simple()));
        if let Err(source) = write_private(&tmp_path, contents.as_bytes()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_err(source));
        }

        if let Err(source) = fs::rename(&tmp_path, &self.file_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_err(source));
        }

        debug!(path = %path_display, "Token file updated");
        Ok(())
    }
}

/// Creates `path` readable by the owner only, then writes `contents`.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.cache).get(key).cloned()
    }

    fn set(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut cache = lock(&self.cache);
        let mut next = cache.clone();
        for (key, value) in entries {
            next.insert((*key).to_string(), (*value).to_string());
        }
        self.save_to_disk(&next)?;
        *cache = next;
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut cache = lock(&self.cache);
        let mut next = cache.clone();
        for key in keys {
            next.remove(*key);
        }
        // The in-memory pair is cleared even if the file cannot be updated
        let result = self.save_to_disk(&next);
        *cache = next;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("medadmin-store-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        store
            .set(&[(ACCESS_TOKEN_KEY, "a"), (REFRESH_TOKEN_KEY, "r")])
            .unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("a"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("r"));

        store.remove(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY]).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_with_tokens() {
        let store = MemoryTokenStore::with_tokens("a", None);
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("a"));
        assert!(store.get(REFRESH_TOKEN_KEY).is_none());
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let store = FileTokenStore::open(temp_path("session.json"));
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let path = temp_path("session.json");
        {
            let store = FileTokenStore::open(&path);
            store
                .set(&[(ACCESS_TOKEN_KEY, "a1"), (REFRESH_TOKEN_KEY, "r1")])
                .unwrap();
        }

        let reopened = FileTokenStore::open(&path);
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("a1"));
        assert_eq!(reopened.get(REFRESH_TOKEN_KEY).as_deref(), Some("r1"));

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["token"], "a1");
        assert_eq!(raw["refreshToken"], "r1");
    }

    #[test]
    fn test_file_store_remove_deletes_file() {
        let path = temp_path("session.json");
        let store = FileTokenStore::open(&path);
        store.set(&[(ACCESS_TOKEN_KEY, "a")]).unwrap();
        assert!(path.exists());

        store.remove(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY]).unwrap();
        assert!(!path.exists());
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
    }

    #[test]
    fn test_file_store_corrupted_file_is_empty() {
        let path = temp_path("session.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::open(&path);
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());

        store.set(&[(ACCESS_TOKEN_KEY, "fresh")]).unwrap();
        let reopened = FileTokenStore::open(&path);
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("fresh"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_path("session.json");
        let store = FileTokenStore::open(&path);
        store.set(&[(ACCESS_TOKEN_KEY, "a")]).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_private_creates_owner_only_file() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_path("session.tmp");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        write_private(&path, b"{}").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_write_private_refuses_existing_file() {
        let path = temp_path("session.tmp");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "planted").unwrap();

        let err = write_private(&path, b"{}").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&path).unwrap(), "planted");
    }

    #[test]
    fn test_file_store_rewrite_replaces_contents() {
        let path = temp_path("session.json");
        let store = FileTokenStore::open(&path);
        store.set(&[(ACCESS_TOKEN_KEY, "first")]).unwrap();
        store.set(&[(ACCESS_TOKEN_KEY, "second")]).unwrap();

        let reopened = FileTokenStore::open(&path);
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("second"));
        let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_token_pair_debug_redacts() {
        let pair = TokenPair {
            access_token: "secret".to_string(),
            refresh_token: Some("also-secret".to_string()),
        };
        let debug = format!("{:?}", pair);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("also-secret"));
    }
}
