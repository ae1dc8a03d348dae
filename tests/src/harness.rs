//! Shared fixture: a bridge behind a facade, wired to the reference host.

use std::sync::Arc;

use async_trait::async_trait;
use logos_bridge::{Bridge, BridgeConfig, Facade};
use logos_host::modules::{CounterModule, MathPlugin};
use logos_host::{
    HostCallError, HostConfig, HostContext, HostModule, HostRuntime, ModuleRegistry, PumpReport,
};
use serde_json::Value;

/// `echo.echo(x)` returns `x`; `echo.fail(msg)` rejects with `msg`.
#[derive(Debug, Default)]
pub struct EchoModule;

#[async_trait]
impl HostModule for EchoModule {
    fn name(&self) -> &str {
        "echo"
    }

    async fn call(
        &self,
        method: &str,
        args: &[Value],
        _ctx: &HostContext,
    ) -> Result<Value, HostCallError> {
        match method {
            "echo" => Ok(args.first().cloned().unwrap_or(Value::Null)),
            "fail" => Err(HostCallError::Failed(
                args.first()
                    .and_then(Value::as_str)
                    .unwrap_or("failed")
                    .to_string(),
            )),
            other => Err(HostCallError::unknown_method("echo", other)),
        }
    }
}

/// Bridge, facade and host runtime sharing one bridge instance.
pub struct Harness {
    pub facade: Facade,
    pub bridge: Arc<Bridge>,
    pub host: HostRuntime,
    pub counter: Arc<CounterModule>,
}

impl Harness {
    /// Harness with default configuration and the demo modules plus `echo` registered.
    pub fn new() -> Self {
        Self::with_config(HostConfig::default())
    }

    pub fn with_config(config: HostConfig) -> Self {
        let bridge = Arc::new(Bridge::new(config.bridge.clone()).expect("valid bridge config"));
        let facade = Facade::new(Arc::clone(&bridge));

        let counter = Arc::new(CounterModule::new());
        let registry = Arc::new(ModuleRegistry::new());
        registry.register(Arc::new(MathPlugin));
        registry.register(counter.clone());
        registry.register(Arc::new(EchoModule));

        let host = HostRuntime::new(bridge.clone(), registry, config);
        Self {
            facade,
            bridge,
            host,
            counter,
        }
    }

    /// Bridge only, no host wired up; useful for timeout flows.
    pub fn bridge_only(config: BridgeConfig) -> (Facade, Arc<Bridge>) {
        let bridge = Arc::new(Bridge::new(config).expect("valid bridge config"));
        (Facade::new(Arc::clone(&bridge)), bridge)
    }

    /// One host pump cycle.
    pub async fn pump(&self) -> PumpReport {
        self.host.pump().await.expect("pump cycle")
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
