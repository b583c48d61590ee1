//! Configuration file management.
//!
//! Reads and validates `vaultify.toml`. Every section is optional:
//!
//! ```toml
//! [encryption]
//! key_path = "/var/lib/vaultify/master.key"
//!
//! [store]
//! sweep_interval_secs = 60
//!
//! [auth]
//! tokens = ["..."]
//!
//! [log]
//! format = "json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants::{self, DEFAULT_SWEEP_INTERVAL};
use crate::core::keys::KeyManager;
use crate::error::{ConfigError, Result};

/// Service configuration stored in `vaultify.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub encryption: EncryptionConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Master key settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncryptionConfig {
    /// Key file path. Defaults to `~/.vaultify/master.key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<PathBuf>,
}

/// In-memory store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Seconds between background sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_sweep_interval_secs() -> u64 {
    DEFAULT_SWEEP_INTERVAL.as_secs()
}

/// Token whitelist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: Vec<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl Config {
    /// Default config path in the current directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from(constants::CONFIG_FILE)
    }

    /// Load and validate configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist,
    /// `ConfigError::Parse` if the TOML is malformed, or
    /// `ConfigError::Invalid` if a value is out of range.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config = Self::parse(&contents)?;

        debug!(
            tokens = config.auth.tokens.len(),
            sweep_interval_secs = config.store.sweep_interval_secs,
            "config loaded"
        );
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse and validate TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.store.sweep_interval_secs == 0 {
            return Err(
                ConfigError::Invalid("store.sweep_interval_secs must be positive".into()).into(),
            );
        }
        if self.auth.tokens.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid("auth.tokens must not contain blanks".into()).into());
        }
        if let Some(path) = &self.encryption.key_path {
            if path.as_os_str().is_empty() {
                return Err(
                    ConfigError::Invalid("encryption.key_path must not be empty".into()).into(),
                );
            }
        }
        Ok(())
    }

    /// Resolved master key path.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::NoHomeDir` if no path is configured and HOME is unknown.
    pub fn key_path(&self) -> Result<PathBuf> {
        match &self.encryption.key_path {
            Some(path) => Ok(path.clone()),
            None => KeyManager::default_path(),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.store.sweep_interval_secs)
    }
}
