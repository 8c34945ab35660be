//! File persistence helpers for session data.
//!
//! Sessions hold authentication cookies, so files are written with
//! restrictive permissions, and atomically: a concurrent load observes
//! either the fully old or fully new session, never a partial write.

use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SessionError;

/// Returns the default session directory.
///
/// - Linux: `~/.local/share/webgrit/sessions`
/// - macOS: `~/Library/Application Support/webgrit/sessions`
/// - Windows: `%APPDATA%\webgrit\sessions`
pub fn default_session_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("webgrit").join("sessions"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Sets owner-only file permissions (0o600) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_permissions(path: &Path) -> Result<(), SessionError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = tokio::fs::metadata(path).await?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// Sets owner-only directory permissions (0o700) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_dir_permissions(path: &Path) -> Result<(), SessionError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = tokio::fs::metadata(path).await?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o700);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_permissions(_path: &Path) -> Result<(), SessionError> {
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_dir_permissions(_path: &Path) -> Result<(), SessionError> {
    Ok(())
}

/// Ensures a directory exists with owner-only permissions.
pub async fn ensure_dir(path: &Path) -> Result<(), SessionError> {
    if !path.exists() {
        debug!(path = %path.display(), "Creating session directory");
        tokio::fs::create_dir_all(path).await?;
        set_restrictive_dir_permissions(path).await?;
    }
    Ok(())
}

/// Saves data to a JSON file atomically (temp file + rename) with
/// owner-only permissions.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), SessionError> {
    debug!(path = %path.display(), "Saving JSON file");

    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }

    let json = serde_json::to_string_pretty(data)?;

    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &json).await?;
    set_restrictive_permissions(&temp_path).await?;
    tokio::fs::rename(&temp_path, path).await?;

    Ok(())
}

/// Loads data from a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, SessionError> {
    let content = tokio::fs::read_to_string(path).await?;
    let data = serde_json::from_str(&content)?;
    Ok(data)
}
