//! # Logos Host
//!
//! Demo host for the Logos bridge.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logs + Prometheus registry)
//! 2. Load configuration (TOML file, then environment)
//! 3. Install the bridge in the process-wide namespace and wait for readiness
//! 4. Register the demo modules
//! 5. Start the pump loop, the overdue-call sweep and the metrics mirror
//! 6. Run a scripted demo through the facade
//! 7. Wait for Ctrl+C, then shut down

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use logos_bridge::{sweep_task, Facade, Listener, Namespace};
use logos_host::modules::{CounterModule, MathPlugin, COUNT_CHANGED};
use logos_host::{HostConfig, HostRuntime, ModuleRegistry};
use logos_telemetry::{init_telemetry, record_snapshot, TelemetryConfig};
use serde_json::json;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Period of the Prometheus mirror.
const METRICS_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let config = HostConfig::load().context("Failed to load host configuration")?;

    let namespace = Namespace::global();
    namespace
        .install(config.bridge.clone())
        .context("Failed to install bridge")?;
    let facade = namespace
        .wait_ready()
        .await
        .context("Bridge did not become ready")?;
    let bridge = Arc::clone(facade.bridge());

    let registry = Arc::new(ModuleRegistry::new());
    registry.register(Arc::new(MathPlugin));
    registry.register(Arc::new(CounterModule::new()));

    let runtime = Arc::new(HostRuntime::new(
        bridge.clone(),
        registry,
        config.clone(),
    ));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let pump = {
        let runtime = Arc::clone(&runtime);
        tokio::spawn(async move { runtime.run(shutdown_rx).await })
    };
    let sweeper = tokio::spawn(sweep_task(
        Arc::clone(bridge.correlator()),
        config.bridge.sweep_interval,
    ));
    let mirror = {
        let bridge = Arc::clone(&bridge);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(METRICS_INTERVAL);
            loop {
                ticker.tick().await;
                record_snapshot(&bridge.metrics());
            }
        })
    };

    if let Err(e) = run_demo(&facade).await {
        error!(error = %e, "Demo failed");
    }

    info!("Host is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    // Graceful shutdown
    info!("Initiating graceful shutdown...");
    if shutdown_tx.send(true).is_err() {
        warn!("Pump loop already stopped");
    }
    if let Err(e) = pump.await {
        error!(error = %e, "Pump task ended abnormally");
    }
    sweeper.abort();
    mirror.abort();

    bridge.shutdown();
    record_snapshot(&bridge.metrics());
    info!(
        metrics = %serde_json::to_string(&bridge.metrics()).unwrap_or_default(),
        "Shutdown complete"
    );

    Ok(())
}

/// Exercise the bridge the way page code would.
async fn run_demo(logos: &Facade) -> Result<()> {
    logos.on(
        COUNT_CHANGED,
        Listener::from_fn(|data| info!(count = %data["count"], "countChanged")),
    );

    let add = logos
        .module("mathPlugin")
        .get("add")
        .context("mathPlugin.add is not callable")?;
    let sum = add.call(vec![json!(2), json!(3)]).await?;
    info!(%sum, "mathPlugin.add(2, 3)");

    let increment = logos
        .module("counter")
        .get("increment")
        .context("counter.increment is not callable")?;
    for _ in 0..2 {
        let count = increment.call(vec![]).await?;
        info!(%count, "counter.increment()");
    }

    // Rejections carry the host's message verbatim.
    if let Some(missing) = logos.module("nope").get("x") {
        match missing.call(vec![]).await {
            Ok(value) => warn!(%value, "Unexpected result from unknown module"),
            Err(e) => info!(error = %e, "nope.x() rejected as expected"),
        }
    }

    Ok(())
}
