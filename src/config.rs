use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::storage::{
    config_path, default_base_dir, read_json, validate_data_dir, write_json, AUTH_FILE,
    BOARDS_FILE, DATA_DIR, LOG_FILE,
};

pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Directory holding auth, boards and the log file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Seconds without input before the app exits. 0 disables the timeout.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_data_dir() -> PathBuf {
    default_base_dir().unwrap_or_else(|_| PathBuf::from(DATA_DIR))
}

fn default_idle_timeout() -> u64 {
    DEFAULT_IDLE_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

impl Config {
    /// Loads `~/.desks/config.json`, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = read_json::<Config>(path)?.unwrap_or_default();
        config.data_dir = validate_data_dir(&config.data_dir)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    /// Applies command-line overrides on top of the file values.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, idle_timeout: Option<u64>) -> Result<Self> {
        if let Some(dir) = data_dir {
            self.data_dir = validate_data_dir(&dir)?;
        }
        if let Some(secs) = idle_timeout {
            self.idle_timeout_secs = secs;
        }
        Ok(self)
    }

    pub fn auth_path(&self) -> PathBuf {
        self.data_dir.join(AUTH_FILE)
    }

    pub fn boards_path(&self) -> PathBuf {
        self.data_dir.join(BOARDS_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}
