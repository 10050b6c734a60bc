use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const DATA_DIR: &str = ".desks";
pub const CONFIG_FILE: &str = "config.json";
pub const AUTH_FILE: &str = "auth.json";
pub const BOARDS_FILE: &str = "boards.json";
pub const LOG_FILE: &str = "desks.log";

pub fn default_base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(DATA_DIR))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(default_base_dir()?.join(CONFIG_FILE))
}

/// Reads and parses a JSON document. A missing file is `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(value))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    atomic_write(path, data.as_bytes())?;
    restrict_file(path)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    restrict_dir(path)
}

/// Rejects data directories that climb out through `..` components.
pub fn validate_data_dir(raw: &Path) -> Result<PathBuf> {
    if raw.as_os_str().is_empty() {
        return Err(anyhow!("Data directory cannot be empty"));
    }
    if raw.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(anyhow!(
            "Data directory is invalid: parent traversal is not allowed"
        ));
    }
    if raw.is_absolute() {
        return Ok(raw.to_path_buf());
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(raw))
}

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().ok_or_else(|| anyhow!("Invalid target path"))?;
    if !parent.exists() {
        fs::create_dir_all(parent)?;
        restrict_dir(parent)?;
    }

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.as_file().sync_all()?;
    temp.persist(path)
        .map_err(|e| anyhow!("Atomic write failed: {}", e.error))?;
    Ok(())
}

fn restrict_file(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if path.exists() {
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
    }
    Ok(())
}

fn restrict_dir(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if path.exists() {
            fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
        }
    }
    Ok(())
}
