//! Configuration for the feed client.
//!
//! Loads configuration from `${QUAD_HOME}/config.toml` with sensible
//! defaults when the file is missing.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the campus feed API.
    pub api_base_url: String,

    /// Request timeout in seconds (0 disables).
    pub request_timeout_secs: u64,
}

impl Config {
    const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

pub mod paths {
    //! Path resolution for quad configuration and session storage.
    //!
    //! QUAD_HOME resolution order:
    //! 1. QUAD_HOME environment variable (if set)
    //! 2. ~/.config/quad (default)

    use std::path::PathBuf;

    /// Returns the quad home directory.
    ///
    /// Checks QUAD_HOME env var first, falls back to ~/.config/quad
    pub fn quad_home() -> PathBuf {
        if let Ok(home) = std::env::var("QUAD_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("quad"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        quad_home().join("config.toml")
    }
}
