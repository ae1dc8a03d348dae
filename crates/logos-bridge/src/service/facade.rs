//! Facade - the single entry point page code uses.
//!
//! Combines subscription management with name-based access to any host
//! module. The facade's own properties (`on`, `removeListener`,
//! `removeAllListeners`) shadow modules of the same name.

use crate::domain::events::Listener;
use crate::domain::proxy::{ModuleProxy, PropertyKey};
use crate::service::bridge::Bridge;
use std::sync::Arc;

/// Result of a property lookup on the facade.
#[derive(Debug, Clone)]
pub enum FacadeProperty {
    /// The `on` method
    On,
    /// The `removeListener` method
    RemoveListener,
    /// The `removeAllListeners` method
    RemoveAllListeners,
    /// A host module
    Module(Arc<ModuleProxy>),
}

/// Cheap-to-clone handle onto an installed bridge.
#[derive(Clone)]
pub struct Facade {
    bridge: Arc<Bridge>,
}

impl Facade {
    pub fn new(bridge: Arc<Bridge>) -> Self {
        Self { bridge }
    }

    /// Subscribe `listener` to `event_name`.
    pub fn on(&self, event_name: &str, listener: Listener) {
        self.bridge.events().subscribe(event_name, listener);
    }

    /// Remove the first registration of `listener` under `event_name`.
    pub fn remove_listener(&self, event_name: &str, listener: &Listener) -> bool {
        self.bridge.events().unsubscribe(event_name, listener)
    }

    /// Remove every subscriber of `event_name`.
    pub fn remove_all_listeners(&self, event_name: &str) -> usize {
        self.bridge.events().unsubscribe_all(event_name)
    }

    /// Proxy for the host module `name`.
    pub fn module(&self, name: &str) -> Arc<ModuleProxy> {
        self.bridge.module(name)
    }

    /// Property lookup by key.
    ///
    /// Own properties win; any other string names a module. Symbol keys
    /// resolve to nothing.
    pub fn get(&self, key: impl Into<PropertyKey>) -> Option<FacadeProperty> {
        let key = key.into();
        let name = key.as_name()?;
        let property = match name {
            "on" => FacadeProperty::On,
            "removeListener" => FacadeProperty::RemoveListener,
            "removeAllListeners" => FacadeProperty::RemoveAllListeners,
            module => FacadeProperty::Module(self.module(module)),
        };
        Some(property)
    }

    /// The bridge behind this facade
    pub fn bridge(&self) -> &Arc<Bridge> {
        &self.bridge
    }
}

impl std::fmt::Debug for Facade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Facade")
            .field("modules", &self.bridge.proxies().len())
            .finish()
    }
}
