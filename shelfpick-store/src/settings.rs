//! User preferences store.
//!
//! Manages user settings with persistence and change notification.

use serde::{Deserialize, Serialize};
use shelfpick_core::DiscoverySource;
use shelfpick_fetch::{Relay, RelaySettings};
use shelfpick_providers::gemini::{DEFAULT_BASE_URL as ANALYSIS_BASE_URL, DEFAULT_MODEL};
use shelfpick_providers::{AnalysisConfig, CatalogEndpoints};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

/// Environment variable holding the analysis API key.
pub const ANALYSIS_KEY_ENV: &str = "GEMINI_API_KEY";

// ============================================================================
// Settings Types
// ============================================================================

/// Persisted settings. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Relays, tried in order.
    pub relays: Vec<Relay>,

    /// Attempts per relay.
    pub max_attempts_per_relay: u32,

    /// Pause after each failed attempt, in milliseconds.
    pub retry_delay_ms: u64,

    /// Per-request timeout, in seconds.
    pub request_timeout_secs: u64,

    /// Aladin TTB API base.
    pub catalog_base_url: String,

    /// Library recommendation endpoint.
    pub library_base_url: String,

    /// Gemini API base.
    pub analysis_base_url: String,

    /// Gemini model.
    pub analysis_model: String,

    /// Where API keys are kept.
    pub credential_backend: CredentialBackend,

    /// Quiet period before a key change is written.
    pub save_debounce_ms: u64,

    /// Source shown when a session starts.
    pub default_source: DiscoverySource,

    /// Directory for CSV exports; `None` means the downloads directory.
    pub export_dir: Option<PathBuf>,

    /// Log level used when no CLI flag overrides it.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        let endpoints = CatalogEndpoints::default();
        Self {
            relays: Relay::defaults(),
            max_attempts_per_relay: 2,
            retry_delay_ms: 1000,
            request_timeout_secs: 30,
            catalog_base_url: endpoints.catalog_base,
            library_base_url: endpoints.library_base,
            analysis_base_url: ANALYSIS_BASE_URL.to_string(),
            analysis_model: DEFAULT_MODEL.to_string(),
            credential_backend: CredentialBackend::default(),
            save_debounce_ms: 500,
            default_source: DiscoverySource::default(),
            export_dir: None,
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Gateway settings.
    pub fn relay_settings(&self) -> RelaySettings {
        RelaySettings {
            relays: self.relays.clone(),
            max_attempts: self.max_attempts_per_relay.max(1),
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }

    /// Provider endpoints.
    pub fn catalog_endpoints(&self) -> CatalogEndpoints {
        CatalogEndpoints {
            catalog_base: self.catalog_base_url.clone(),
            library_base: self.library_base_url.clone(),
        }
    }

    /// Analysis endpoint, keyed from [`ANALYSIS_KEY_ENV`].
    pub fn analysis_config(&self) -> AnalysisConfig {
        self.analysis_config_with_key(std::env::var(ANALYSIS_KEY_ENV).ok())
    }

    /// Analysis endpoint with an explicit key.
    pub fn analysis_config_with_key(&self, api_key: Option<String>) -> AnalysisConfig {
        AnalysisConfig {
            base_url: self.analysis_base_url.clone(),
            model: self.analysis_model.clone(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            ..Default::default()
        }
    }

    /// Debounce window for credential writes.
    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}

/// Credential storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CredentialBackend {
    /// `credentials.json` next to the settings file.
    #[default]
    File,
    /// The system keychain.
    Keychain,
}

impl std::fmt::Display for CredentialBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialBackend::File => write!(f, "file"),
            CredentialBackend::Keychain => write!(f, "keychain"),
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    #[default]
    Warn,
    /// Informational.
    Info,
    /// Debug.
    Debug,
    /// Everything.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Settings with persistence and change notification.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl SettingsStore {
    /// Creates a store holding defaults.
    pub fn new(path: PathBuf) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Reserved for unrecoverable IO failures; unreadable files fall back
    /// to defaults.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// # Errors
    ///
    /// Reserved for unrecoverable IO failures; unreadable files fall back
    /// to defaults.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        let (notify, _) = watch::channel(0);
        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        })
    }

    /// Path the store saves to.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings and notifies subscribers.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.notify_change().await;
    }

    /// Restores defaults and notifies subscribers.
    pub async fn reset(&self) {
        self.update(|s| *s = Settings::default()).await;
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }
}

// ============================================================================
// Tests
// ============================================================================
