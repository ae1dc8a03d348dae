//! Install-once slot for the facade plus the readiness signal.
//!
//! The bootstrap may run more than once per process; only the first
//! `install()` builds a bridge. Later attempts leave the installed bridge,
//! its in-flight calls and its subscriptions untouched.

use crate::domain::config::BridgeConfig;
use crate::error::ConfigError;
use crate::service::bridge::Bridge;
use crate::service::facade::Facade;
use std::sync::{Arc, OnceLock};
use tokio::sync::watch;
use tracing::{debug, info};

/// Name of the readiness notification.
pub const READY_EVENT: &str = "logos#initialized";

/// Outcome of an install attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Installation {
    /// This call built and installed the bridge
    Installed,
    /// A bridge was already installed; nothing changed
    AlreadyInstalled,
}

/// Slot holding at most one facade for its whole lifetime.
pub struct Namespace {
    slot: OnceLock<Facade>,
    ready: watch::Sender<bool>,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespace {
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            slot: OnceLock::new(),
            ready,
        }
    }

    /// Process-wide namespace.
    pub fn global() -> &'static Namespace {
        static GLOBAL: OnceLock<Namespace> = OnceLock::new();
        GLOBAL.get_or_init(Namespace::new)
    }

    /// Install a bridge built from `config` unless one is installed already.
    ///
    /// When already installed, `config` is not even validated. Readiness is
    /// announced once, by the call that installs.
    pub fn install(&self, config: BridgeConfig) -> Result<Installation, ConfigError> {
        if self.slot.get().is_some() {
            debug!("Bridge already installed; skipping");
            return Ok(Installation::AlreadyInstalled);
        }
        config.validate()?;

        let mut installed = false;
        self.slot.get_or_init(|| {
            installed = true;
            Facade::new(Arc::new(Bridge::build(config)))
        });

        if !installed {
            debug!("Bridge installed concurrently; skipping");
            return Ok(Installation::AlreadyInstalled);
        }

        self.ready.send_replace(true);
        info!(event = READY_EVENT, "Bridge installed");
        Ok(Installation::Installed)
    }

    /// The installed facade, if any
    pub fn facade(&self) -> Option<Facade> {
        self.slot.get().cloned()
    }

    pub fn is_installed(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Wait until a bridge is installed, then return its facade.
    ///
    /// Returns at once if installation already happened.
    pub async fn wait_ready(&self) -> Option<Facade> {
        let mut rx = self.ready.subscribe();
        let ready = rx.wait_for(|ready| *ready).await.is_ok();
        if !ready {
            return None;
        }
        self.facade()
    }

    /// Receiver that flips to `true` exactly once, on installation.
    pub fn subscribe_ready(&self) -> watch::Receiver<bool> {
        self.ready.subscribe()
    }
}
