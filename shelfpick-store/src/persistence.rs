//! Where Shelfpick keeps its files, and how JSON gets there.
//!
//! Settings and credentials are written atomically and readable by the
//! owner only.

use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Platform config directory for Shelfpick.
///
/// `~/Library/Application Support/Shelfpick` on macOS, `<config>/shelfpick`
/// elsewhere.
pub fn default_config_dir() -> PathBuf {
    let name = if cfg!(target_os = "macos") { "Shelfpick" } else { "shelfpick" };
    dirs::config_dir()
        .map(|c| c.join(name))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `settings.json` in the config directory.
pub fn default_settings_path() -> PathBuf {
    default_config_dir().join("settings.json")
}

/// `credentials.json` in the config directory.
pub fn default_credentials_path() -> PathBuf {
    default_config_dir().join("credentials.json")
}

/// Export target when none is configured: the downloads directory.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

// ============================================================================
// Owner-only access
// ============================================================================

#[cfg(unix)]
async fn restrict(path: &Path, mode: u32) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict(_path: &Path, _mode: u32) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// JSON files
// ============================================================================

/// Writes `data` as pretty JSON through a temp file and a rename.
///
/// A missing parent directory is created with mode 0700; the file ends up
/// 0600.
///
/// # Errors
///
/// Returns an error if serialization or any filesystem step fails.
pub async fn save_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !tokio::fs::try_exists(parent).await? {
            tokio::fs::create_dir_all(parent).await?;
            restrict(parent, 0o700).await?;
        }
    }

    let temp = path.with_extension("json.tmp");
    tokio::fs::write(&temp, serde_json::to_vec_pretty(data)?).await?;
    tokio::fs::rename(&temp, path).await?;
    restrict(path, 0o600).await?;

    debug!(path = %path.display(), "Saved");
    Ok(())
}

/// Reads and parses a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// [`load_json`], falling back to `T::default()`. A missing file is
/// silent; a corrupt one is logged.
pub async fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path).await {
        Ok(data) => data,
        Err(StoreError::Io(_)) => T::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Unreadable file, using defaults");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        assert!(default_config_dir().ends_with("shelfpick") || default_config_dir().ends_with("Shelfpick"));
        assert!(default_settings_path().ends_with("settings.json"));
        assert!(default_credentials_path().ends_with("credentials.json"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_owner_only_modes() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("config");
        let file = dir.join("credentials.json");

        save_json(&file, &serde_json::json!({"api_keys": "{}"})).await.unwrap();

        let file_mode = tokio::fs::metadata(&file).await.unwrap().permissions().mode() & 0o777;
        let dir_mode = tokio::fs::metadata(&dir).await.unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
        assert_eq!(dir_mode, 0o700);
    }
}
