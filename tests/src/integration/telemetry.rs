//! # Telemetry Flow
//!
//! Bridge counters mirrored into the Prometheus registry after host traffic.

#[cfg(test)]
mod tests {
    use logos_telemetry::{
        gather_text, record_snapshot, register_metrics, BRIDGE_CALLS, HOST_MODULE_CALLS,
    };
    use serde_json::json;

    use crate::harness::Harness;

    #[tokio::test]
    async fn test_snapshot_mirrors_into_prometheus() {
        register_metrics().unwrap();
        let harness = Harness::new();

        let sum = harness.bridge.call("mathPlugin", "add", vec![json!(2), json!(3)]);
        let missing = harness.bridge.call("nope", "x", vec![]);
        harness.pump().await;
        assert_eq!(sum.await.unwrap(), json!(5));
        assert!(missing.await.is_err());

        let snapshot = harness.bridge.metrics();
        record_snapshot(&snapshot);

        // Registry counters are process-wide; other tests may push them higher.
        assert!(BRIDGE_CALLS.with_label_values(&["issued"]).get() >= snapshot.calls_issued);
        assert!(BRIDGE_CALLS.with_label_values(&["rejected"]).get() >= 1);
        assert!(HOST_MODULE_CALLS.with_label_values(&["mathPlugin", "ok"]).get() >= 1);

        let text = gather_text().unwrap();
        assert!(text.contains("logos_bridge_calls_total"));
        assert!(text.contains("logos_host_module_calls_total"));
    }
}
