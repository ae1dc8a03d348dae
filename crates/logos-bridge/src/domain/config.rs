//! Bridge configuration with validation.
//!
//! # Example
//!
//! ```ignore
//! use logos_bridge::BridgeConfig;
//! use std::time::Duration;
//!
//! let config = BridgeConfig::default().with_request_timeout(Duration::from_secs(5));
//! config.validate()?;
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default deadline for a remote call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default period of the overdue-call sweep.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// How long a call may stay in flight before it rejects with a timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// How often hosts should reap calls whose timer could not be armed
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// # Environment Variables
    ///
    /// - `LOGOS_REQUEST_TIMEOUT`: call deadline, humantime format (default: 30s)
    /// - `LOGOS_SWEEP_INTERVAL`: sweep period, humantime format (default: 1s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// Override fields from the environment variables listed on
    /// [`from_env`](Self::from_env), then validate.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Some(timeout) = duration_var("LOGOS_REQUEST_TIMEOUT")? {
            self.request_timeout = timeout;
        }
        if let Some(interval) = duration_var("LOGOS_SWEEP_INTERVAL")? {
            self.sweep_interval = interval;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "request_timeout cannot be 0".into(),
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "sweep_interval cannot be 0".into(),
            ));
        }
        Ok(())
    }

    /// Builder-style method to set the call deadline
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builder-style method to set the sweep period
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

/// Read a humantime duration from `var`, if set.
pub fn duration_var(var: &'static str) -> Result<Option<Duration>, ConfigError> {
    match env::var(var) {
        Ok(value) => humantime::parse_duration(value.trim())
            .map(Some)
            .map_err(|_| ConfigError::InvalidDuration { var, value }),
        Err(_) => Ok(None),
    }
}
