//! Store error types.

use shelfpick_core::BoardError;
use shelfpick_providers::{AnalysisError, CatalogError};
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Keychain access failed.
    #[error("Keychain error: {0}")]
    Keychain(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog call failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Analysis call failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Board rejected an action.
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl From<keyring::Error> for StoreError {
    fn from(err: keyring::Error) -> Self {
        StoreError::Keychain(err.to_string())
    }
}

impl StoreError {
    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Io(_) | StoreError::Catalog(CatalogError::Network(_))
        )
    }
}
