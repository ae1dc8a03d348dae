//! Dynamic Module Proxy - any property name on a module becomes a remote call.
//!
//! There is no static list of modules or methods. `ModuleProxy::get("add")`
//! hands back a callable that issues `logos_request{module, "add", args}`.
//! Two keys are deliberately not callable:
//!
//! - `then`, so that awaiting a proxy (or resolving a promise with one) does
//!   not treat it as a thenable and fire a bogus call
//! - symbol keys, which are never method names

use crate::domain::pending::{CallCorrelator, PendingReply};
use crate::ports::RemoteModule;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Property name reserved by promise-resolution machinery.
pub const THENABLE_KEY: &str = "then";

/// Key used to look up a property on a proxy or the facade.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// Ordinary string property
    Name(String),
    /// Non-string key (symbol); carries a description for logging only
    Symbol(String),
}

impl PropertyKey {
    /// The string name, if this is a string key.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            PropertyKey::Name(name) => Some(name),
            PropertyKey::Symbol(_) => None,
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        PropertyKey::Name(name.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(name: String) -> Self {
        PropertyKey::Name(name)
    }
}

/// Stand-in for a host module.
#[derive(Clone)]
pub struct ModuleProxy {
    name: String,
    correlator: Arc<CallCorrelator>,
}

impl ModuleProxy {
    pub fn new(name: impl Into<String>, correlator: Arc<CallCorrelator>) -> Self {
        Self {
            name: name.into(),
            correlator,
        }
    }

    /// Resolve a property to a callable method.
    ///
    /// Returns `None` for `then` and for symbol keys. Every other name,
    /// including the empty string, yields a handle; no traffic is produced
    /// until the handle is called.
    pub fn get(&self, key: impl Into<PropertyKey>) -> Option<MethodHandle> {
        let key = key.into();
        let method = key.as_name()?;
        if method == THENABLE_KEY {
            return None;
        }
        Some(MethodHandle {
            module: self.name.clone(),
            method: method.to_string(),
            correlator: self.correlator.clone(),
        })
    }
}

impl RemoteModule for ModuleProxy {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, method: &str, args: Vec<Value>) -> PendingReply {
        self.correlator.issue_call(&self.name, method, args)
    }
}

impl std::fmt::Debug for ModuleProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleProxy").field("name", &self.name).finish()
    }
}

/// A `module.method` pair ready to be called any number of times.
#[derive(Clone)]
pub struct MethodHandle {
    module: String,
    method: String,
    correlator: Arc<CallCorrelator>,
}

impl MethodHandle {
    /// Issue `module.method(args)` with the default deadline.
    pub fn call(&self, args: Vec<Value>) -> PendingReply {
        self.correlator.issue_call(&self.module, &self.method, args)
    }

    /// Issue `module.method(args)` with an explicit deadline.
    pub fn call_with_timeout(&self, args: Vec<Value>, timeout: Duration) -> PendingReply {
        self.correlator
            .issue_call_with_timeout(&self.module, &self.method, args, timeout)
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

impl std::fmt::Debug for MethodHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MethodHandle({}.{})", self.module, self.method)
    }
}

/// Proxies by module name, created on first access.
pub struct ProxyCache {
    proxies: DashMap<String, Arc<ModuleProxy>>,
    correlator: Arc<CallCorrelator>,
}

impl ProxyCache {
    pub fn new(correlator: Arc<CallCorrelator>) -> Self {
        Self {
            proxies: DashMap::new(),
            correlator,
        }
    }

    /// Proxy for `name`; repeated lookups return the same instance.
    pub fn get_or_create(&self, name: &str) -> Arc<ModuleProxy> {
        if let Some(proxy) = self.proxies.get(name) {
            return proxy.clone();
        }
        self.proxies
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(ModuleProxy::new(name, self.correlator.clone())))
            .clone()
    }

    /// Number of distinct modules accessed
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}
