// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Shelfpick Store
//!
//! State management for Shelfpick.
//!
//! This crate provides:
//!
//! - **Session**: the owned board, clients and credentials for one librarian
//! - **SettingsStore**: user preferences with persistence
//! - **CredentialStore**: the persisted API key pair with debounced saves
//! - **Export**: purchase-order CSV
//! - **Persistence**: file I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use shelfpick_store::{CredentialStore, JsonFileStore, Session, SettingsStore};
//!
//! let settings = SettingsStore::load_default().await?.get().await;
//! let backend = Arc::new(JsonFileStore::new(default_credentials_path()));
//! let credentials = CredentialStore::load(backend, settings.save_debounce()).await;
//!
//! let mut session = Session::new(catalog, analysis, credentials, settings.default_source).await;
//! session.reload().await?;
//! session.add("123456")?;
//! ```

pub mod credentials;
pub mod error;
pub mod export;
pub mod persistence;
pub mod session;
pub mod settings;

pub use credentials::{CredentialStore, JsonFileStore, KeyValueStore, KeychainStore, API_KEYS_ENTRY};
pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_credentials_path, default_export_dir, default_settings_path,
    load_json, load_json_or_default, save_json,
};
pub use session::{BrowseMode, CompletedLoad, PendingLoad, Session};
pub use settings::{CredentialBackend, LogLevel, Settings, SettingsStore, ANALYSIS_KEY_ENV};
