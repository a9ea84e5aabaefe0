//! Credential storage for the two session secrets.
//!
//! The original client branched on the platform at every call site ("web uses
//! the plain key/value store, everything else uses the secure store"). Here
//! the choice is made once: `CredentialStore` is the single contract the rest
//! of the crate sees, with a keychain-backed implementation for platforms
//! that have one and a plaintext file fallback for those that do not.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use keyring::Entry;
use thiserror::Error;
use tracing::{debug, warn};

/// Well-known key for the session bearer token
pub const TOKEN_KEY: &str = "userToken";

/// Well-known key for the current user's identifier
pub const USER_ID_KEY: &str = "userId";

/// Keychain service name credentials are filed under
const SERVICE_NAME: &str = "tradium";

/// File name for the fallback store
const CREDENTIALS_FILE: &str = "credentials.json";

#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store itself could not be read or written. Distinct from
    /// a missing key, which is `Ok(None)`: callers can tell "no session"
    /// apart from "cannot read session".
    #[error("Credential storage unavailable: {0}")]
    Unavailable(String),
}

/// Uniform contract over the platform credential stores.
///
/// A missing key is never an error; only a failure of the backing store
/// surfaces as `StoreError::Unavailable`.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Secure, per-item credential store backed by the OS keychain.
pub struct KeyringStore;

impl KeyringStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(key: &str) -> Result<Entry, StoreError> {
        Entry::new(SERVICE_NAME, key).map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// Probe whether the keychain is usable on this platform.
    /// A missing entry counts as usable; only a platform-level failure does not.
    pub fn available() -> bool {
        match Self::entry(TOKEN_KEY) {
            Ok(entry) => !matches!(
                entry.get_password(),
                Err(keyring::Error::PlatformFailure(_)) | Err(keyring::Error::NoStorageAccess(_))
            ),
            Err(_) => false,
        }
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match Self::entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::entry(key)?
            .set_password(value)
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }
}

/// Best-effort credential store backed by a plaintext JSON file.
///
/// Used on platforms without a keychain. Values are NOT encrypted at rest;
/// this is an accepted trust-boundary reduction for those platforms and is
/// deliberately not papered over here.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(CREDENTIALS_FILE),
        }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        }
        let contents =
            serde_json::to_string_pretty(map).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        std::fs::write(&self.path, contents).map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// Select the credential store for this platform.
///
/// Prefers the OS keychain; falls back to the plaintext file store under
/// `fallback_dir` when no keychain is usable.
pub fn platform_store(fallback_dir: &Path) -> Box<dyn CredentialStore> {
    if KeyringStore::available() {
        debug!("Using OS keychain for credential storage");
        Box::new(KeyringStore::new())
    } else {
        warn!(
            path = %fallback_dir.display(),
            "No usable keychain; storing credentials in an unencrypted file"
        );
        Box::new(FileStore::new(fallback_dir))
    }
}
