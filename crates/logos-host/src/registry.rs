//! # Module Registry
//!
//! Host modules by name. Registration may happen at any time, including
//! while the runtime is pumping; a call sees whatever is registered when it
//! executes.

use crate::module::HostModule;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Registered host modules.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: DashMap<String, Arc<dyn HostModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `module` under its own name. Returns the module it replaced.
    pub fn register(&self, module: Arc<dyn HostModule>) -> Option<Arc<dyn HostModule>> {
        let name = module.name().to_string();
        let previous = self.modules.insert(name.clone(), module);
        if previous.is_some() {
            warn!(module = %name, "Replaced host module");
        } else {
            info!(module = %name, "Registered host module");
        }
        previous
    }

    /// Remove a module. Later calls to it fail with "Module not connected".
    pub fn unregister(&self, name: &str) -> Option<Arc<dyn HostModule>> {
        self.modules.remove(name).map(|(_, module)| module)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn HostModule>> {
        self.modules.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
