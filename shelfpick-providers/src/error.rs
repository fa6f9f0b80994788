//! Catalog errors.

use shelfpick_core::CredentialKind;
use shelfpick_fetch::FetchError;
use thiserror::Error;

/// Errors from catalog and library calls.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Every relay attempt failed.
    #[error("Network error: {0}")]
    Network(#[from] FetchError),

    /// The provider reported a business error inside a 2xx body.
    #[error("Provider error: {message}")]
    Provider {
        /// Provider error code, when one was sent.
        code: Option<String>,
        /// Provider message.
        message: String,
    },

    /// The selected source needs a credential that is not configured.
    #[error("Missing {0} credential")]
    MissingCredential(CredentialKind),

    /// The body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl CatalogError {
    /// Builds a provider error.
    pub fn provider(code: Option<String>, message: impl Into<String>) -> Self {
        CatalogError::Provider {
            code,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}
