//! API key persistence.
//!
//! The serialized [`ApiKeys`] record is the only durable state. It lives
//! under a single entry of a [`KeyValueStore`], either a JSON file or the
//! system keychain. [`CredentialStore`] loads it once and coalesces bursts
//! of edits into one write after a quiet period.

use async_trait::async_trait;
use keyring::Entry;
use shelfpick_core::{ApiKeys, CredentialKind};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{load_json_or_default, save_json};

/// Entry name the credential record is stored under.
pub const API_KEYS_ENTRY: &str = "api_keys";

/// Keychain service name.
const KEYCHAIN_SERVICE: &str = "Shelfpick";

// ============================================================================
// Key-Value Backends
// ============================================================================

/// A string-to-string store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads an entry.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes an entry.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes an entry; a missing entry is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Entries kept in one owner-only JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Backing file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn entries(&self) -> BTreeMap<String, String> {
        load_json_or_default(&self.path).await
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().await.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries().await;
        entries.insert(key.to_string(), value.to_string());
        save_json(&self.path, &entries).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries().await;
        if entries.remove(key).is_some() {
            save_json(&self.path, &entries).await?;
        }
        Ok(())
    }
}

/// Entries kept in the system keychain, one credential per key.
#[derive(Debug, Clone)]
pub struct KeychainStore {
    service: String,
}

impl Default for KeychainStore {
    fn default() -> Self {
        Self::new(KEYCHAIN_SERVICE)
    }
}

impl KeychainStore {
    /// Creates a store under `service`.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, StoreError> {
        Ok(Entry::new(&self.service, key)?)
    }
}

#[async_trait]
impl KeyValueStore for KeychainStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        debug!(service = %self.service, key, "Reading keychain entry");
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                warn!(service = %self.service, key, error = %e, "Keychain read failed");
                Err(e.into())
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        debug!(service = %self.service, key, "Writing keychain entry");
        self.entry(key)?.set_password(value).map_err(|e| {
            warn!(service = %self.service, key, error = %e, "Keychain write failed");
            StoreError::from(e)
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Credential Store
// ============================================================================

/// In-memory [`ApiKeys`] with debounced persistence.
pub struct CredentialStore {
    backend: Arc<dyn KeyValueStore>,
    keys: Arc<RwLock<ApiKeys>>,
    debounce: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Loads the stored record; a missing or unreadable record yields empty
    /// keys.
    pub async fn load(backend: Arc<dyn KeyValueStore>, debounce: Duration) -> Self {
        let keys = match backend.get(API_KEYS_ENTRY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Stored API keys are unreadable, starting empty");
                ApiKeys::default()
            }),
            Ok(None) => {
                debug!("No stored API keys");
                ApiKeys::default()
            }
            Err(e) => {
                warn!(error = %e, "Could not read API keys, starting empty");
                ApiKeys::default()
            }
        };

        Self {
            backend,
            keys: Arc::new(RwLock::new(keys)),
            debounce,
            pending: Mutex::new(None),
        }
    }

    /// Current keys.
    pub async fn keys(&self) -> ApiKeys {
        self.keys.read().await.clone()
    }

    /// Replaces one key and schedules a write.
    pub async fn set(&self, kind: CredentialKind, key: impl Into<String>) {
        self.keys.write().await.set(kind, key);
        self.schedule_save();
    }

    /// Replaces both keys and schedules a write.
    pub async fn replace(&self, keys: ApiKeys) {
        *self.keys.write().await = keys;
        self.schedule_save();
    }

    /// True while a scheduled write has not run yet.
    pub fn has_pending_save(&self) -> bool {
        self.pending
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Cancels any scheduled write and saves now.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub async fn flush(&self) -> Result<(), StoreError> {
        if let Some(handle) = self.take_pending() {
            handle.abort();
        }
        let keys = self.keys.read().await.clone();
        write_keys(self.backend.as_ref(), &keys).await
    }

    fn take_pending(&self) -> Option<JoinHandle<()>> {
        self.pending.lock().ok().and_then(|mut guard| guard.take())
    }

    fn schedule_save(&self) {
        if let Some(previous) = self.take_pending() {
            previous.abort();
        }

        let backend = Arc::clone(&self.backend);
        let keys = Arc::clone(&self.keys);
        let delay = self.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let snapshot = keys.read().await.clone();
            if let Err(e) = write_keys(backend.as_ref(), &snapshot).await {
                warn!(error = %e, "Failed to persist API keys");
            }
        });

        if let Ok(mut guard) = self.pending.lock() {
            *guard = Some(handle);
        }
    }
}

async fn write_keys(backend: &dyn KeyValueStore, keys: &ApiKeys) -> Result<(), StoreError> {
    let raw = serde_json::to_string(keys)?;
    backend.set(API_KEYS_ENTRY, &raw).await?;
    info!("API keys saved");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
