//! Configuration for byamn-challenges

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ChallengeError;

/// Default storage directory
pub fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("byamn-challenges")
}

/// Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Storage directory for the progress database
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Broadcast capacity of the challenge event bus
    #[serde(default = "default_event_capacity")]
    pub event_channel_capacity: usize,

    /// Emit best-effort analytics events on challenge completion
    #[serde(default = "default_true")]
    pub analytics_enabled: bool,
}

fn default_event_capacity() -> usize {
    256
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            event_channel_capacity: default_event_capacity(),
            analytics_enabled: true,
        }
    }
}

impl Config {
    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChallengeError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ChallengeError::Config(format!("Invalid config: {}", e)))
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ChallengeError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ChallengeError::Config(format!("Serialization failed: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get progress database path
    pub fn progress_db_path(&self) -> PathBuf {
        self.storage_dir.join("progress.sled")
    }

    /// Get config file path
    pub fn config_path(&self) -> PathBuf {
        self.storage_dir.join("config.toml")
    }
}
