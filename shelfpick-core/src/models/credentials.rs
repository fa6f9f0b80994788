//! Provider credentials.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which provider credential is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    /// Commercial catalog (Aladin TTB) key.
    Catalog,
    /// National library recommendation API key.
    Library,
}

impl CredentialKind {
    /// Returns the display name for this credential.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Catalog => "Catalog",
            Self::Library => "Library",
        }
    }

    /// Returns both kinds.
    pub fn all() -> &'static [CredentialKind] {
        &[Self::Catalog, Self::Library]
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The persisted credential pair.
///
/// Missing fields deserialize as empty strings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiKeys {
    /// Commercial catalog key.
    pub catalog_key: String,
    /// Library recommendation key.
    pub library_key: String,
}

impl ApiKeys {
    /// Creates a credential pair.
    pub fn new(catalog_key: impl Into<String>, library_key: impl Into<String>) -> Self {
        Self {
            catalog_key: catalog_key.into(),
            library_key: library_key.into(),
        }
    }

    /// Returns the key for `kind`.
    pub fn get(&self, kind: CredentialKind) -> &str {
        match kind {
            CredentialKind::Catalog => &self.catalog_key,
            CredentialKind::Library => &self.library_key,
        }
    }

    /// Replaces the key for `kind`.
    pub fn set(&mut self, kind: CredentialKind, key: impl Into<String>) {
        let key = key.into();
        match kind {
            CredentialKind::Catalog => self.catalog_key = key,
            CredentialKind::Library => self.library_key = key,
        }
    }

    /// Returns the trimmed key for `kind`, or `None` when blank.
    pub fn configured(&self, kind: CredentialKind) -> Option<&str> {
        let key = self.get(kind).trim();
        (!key.is_empty()).then_some(key)
    }

    /// Returns the key for `kind` with everything past the first four
    /// characters hidden.
    pub fn masked(&self, kind: CredentialKind) -> String {
        mask(self.get(kind))
    }
}

// Keys never end up in logs.
impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeys")
            .field("catalog_key", &mask(&self.catalog_key))
            .field("library_key", &mask(&self.library_key))
            .finish()
    }
}

/// Masks a secret, keeping the first four characters.
fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let head: String = secret.chars().take(4).collect();
    format!("{head}…")
}
