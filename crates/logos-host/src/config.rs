//! # Host Configuration
//!
//! Loaded from an optional TOML file, then overridden from the environment.
//!
//! ```toml
//! poll_interval = "16ms"
//! max_args = 3
//!
//! [bridge]
//! request_timeout = "30s"
//! sweep_interval = "1s"
//! ```

use logos_bridge::domain::config::duration_var;
use logos_bridge::{BridgeConfig, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default period between pump cycles (one frame at 60Hz).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Default cap on positional arguments per call.
pub const DEFAULT_MAX_ARGS: usize = 3;

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_VAR: &str = "LOGOS_HOST_CONFIG";

/// Complete host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// How often the runtime drains the outbox
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Calls with more arguments are rejected without reaching a module
    pub max_args: usize,
    /// Bridge settings
    pub bridge: BridgeConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_args: DEFAULT_MAX_ARGS,
            bridge: BridgeConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum HostConfigError {
    /// Config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema.
    #[error("invalid host config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Bridge section failed validation.
    #[error(transparent)]
    Bridge(#[from] ConfigError),

    /// Poll interval was zero.
    #[error("poll_interval cannot be 0")]
    ZeroPollInterval,
}

impl HostConfig {
    /// Parse from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, HostConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HostConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| HostConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load configuration for the binary.
    ///
    /// # Environment Variables
    ///
    /// - `LOGOS_HOST_CONFIG`: path of a TOML file to start from (optional)
    /// - `LOGOS_POLL_INTERVAL`: pump period, humantime format (default: 16ms)
    /// - `LOGOS_REQUEST_TIMEOUT`, `LOGOS_SWEEP_INTERVAL`: bridge overrides
    pub fn load() -> Result<Self, HostConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), HostConfigError> {
        if let Some(interval) = duration_var("LOGOS_POLL_INTERVAL")? {
            self.poll_interval = interval;
        }
        self.bridge = self.bridge.clone().apply_env()?;
        self.validate()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), HostConfigError> {
        if self.poll_interval.is_zero() {
            return Err(HostConfigError::ZeroPollInterval);
        }
        self.bridge.validate()?;
        Ok(())
    }
}
