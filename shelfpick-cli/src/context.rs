//! Wiring shared by every command.

use anyhow::Result;
use shelfpick_fetch::RelayGateway;
use shelfpick_providers::{AnalysisClient, CatalogClient};
use shelfpick_store::{
    default_credentials_path, CredentialBackend, CredentialStore, JsonFileStore, KeyValueStore,
    KeychainStore, Settings, SettingsStore,
};
use std::sync::Arc;
use tracing::debug;

/// Settings plus the clients built from them.
pub struct AppContext {
    pub settings: Settings,
    pub catalog: CatalogClient,
    pub analysis: AnalysisClient,
}

impl AppContext {
    /// Loads settings from the default path and builds clients.
    pub async fn load() -> Result<Self> {
        let settings = SettingsStore::load_default().await?.get().await;
        Self::from_settings(settings)
    }

    /// Builds clients from `settings`.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let gateway = RelayGateway::new(settings.relay_settings())?;
        let catalog = CatalogClient::new(Arc::new(gateway), settings.catalog_endpoints());
        let analysis = AnalysisClient::new(settings.analysis_config())?;
        debug!(relays = settings.relays.len(), backend = %settings.credential_backend, "Context ready");

        Ok(Self {
            settings,
            catalog,
            analysis,
        })
    }

    /// Opens the configured credential backend.
    pub async fn credentials(&self) -> CredentialStore {
        let backend: Arc<dyn KeyValueStore> = match self.settings.credential_backend {
            CredentialBackend::File => Arc::new(JsonFileStore::new(default_credentials_path())),
            CredentialBackend::Keychain => Arc::new(KeychainStore::default()),
        };
        CredentialStore::load(backend, self.settings.save_debounce()).await
    }
}
