//! # Wire Flow
//!
//! Raw channel traffic and the drain contract as the host sees them.

#[cfg(test)]
mod tests {
    use logos_bridge::{BridgeConfig, Dispatch, HostChannel, RequestId};
    use serde_json::json;

    use crate::harness::Harness;

    #[tokio::test]
    async fn test_drain_json_shape_and_second_drain_is_empty() {
        let (facade, bridge) = Harness::bridge_only(BridgeConfig::default());
        let first = facade.module("mathPlugin").get("add").unwrap().call(vec![json!(2), json!(3)]);
        let second = facade.module("counter").get("reset").unwrap().call(vec![]);

        assert_eq!(
            bridge.drain_json(),
            json!([
                {
                    "type": "logos_request",
                    "requestId": first.request_id().get(),
                    "module": "mathPlugin",
                    "method": "add",
                    "args": [2, 3]
                },
                {
                    "type": "logos_request",
                    "requestId": second.request_id().get(),
                    "module": "counter",
                    "method": "reset",
                    "args": []
                }
            ])
        );
        assert_eq!(bridge.drain_json(), json!([]));
        assert_eq!(bridge.metrics().outbox_drained, 2);
    }

    #[tokio::test]
    async fn test_requests_issued_between_drains_wait_for_the_next_one() {
        let (_facade, bridge) = Harness::bridge_only(BridgeConfig::default());
        let a = bridge.call("m", "a", vec![]);
        assert_eq!(bridge.drain().len(), 1);

        let b = bridge.call("m", "b", vec![]);
        let next = bridge.drain();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].request_id(), b.request_id());
        assert!(a.request_id() < b.request_id());
    }

    #[tokio::test]
    async fn test_raw_text_response_settles_call() {
        let (_facade, bridge) = Harness::bridge_only(BridgeConfig::default());
        let reply = bridge.call("mathPlugin", "add", vec![json!(2), json!(3)]);
        let text = format!(
            r#"{{"type":"logos_response","requestId":{},"result":5}}"#,
            reply.request_id()
        );

        assert_eq!(bridge.handle_raw(&text), Dispatch::Resolved(reply.request_id()));
        assert_eq!(reply.await.unwrap(), json!(5));
    }

    #[tokio::test]
    async fn test_raw_text_error_rejects_verbatim() {
        let (_facade, bridge) = Harness::bridge_only(BridgeConfig::default());
        let reply = bridge.call("nope", "x", vec![]);
        let text = format!(
            r#"{{"type":"logos_response","requestId":{},"error":"Module not connected: nope"}}"#,
            reply.request_id()
        );

        assert_eq!(bridge.handle_raw(&text), Dispatch::Rejected(reply.request_id()));
        assert_eq!(reply.await.unwrap_err().to_string(), "Module not connected: nope");
    }

    #[tokio::test]
    async fn test_foreign_traffic_is_ignored() {
        let (_facade, bridge) = Harness::bridge_only(BridgeConfig::default());
        let reply = bridge.call("m", "f", vec![]);

        for text in [
            "not json at all",
            "",
            "42",
            r#""logos_response""#,
            r#"{"kind":"logos_event"}"#,
            r#"{"type":"devtools_ping","id":1}"#,
            r#"{"type":"logos_request","requestId":1,"module":"m","method":"f","args":[]}"#,
            r#"{"type":"logos_response","result":5}"#,
            r#"{"type":"logos_event","data":{}}"#,
        ] {
            assert_eq!(bridge.handle_raw(text), Dispatch::Ignored, "should ignore {text:?}");
        }

        // Nothing settled, nothing fanned out.
        assert!(bridge.correlator().is_pending(&reply.request_id()));
        let metrics = bridge.metrics();
        assert_eq!(metrics.messages_ignored, 9);
        assert_eq!(metrics.events_dispatched, 0);
        assert_eq!(metrics.calls_resolved + metrics.calls_rejected, 0);
    }

    #[tokio::test]
    async fn test_unknown_request_id_is_unroutable() {
        let (_facade, bridge) = Harness::bridge_only(BridgeConfig::default());
        let response = json!({"type": "logos_response", "requestId": 4242, "result": true});
        assert_eq!(
            bridge.handle_message(&response),
            Dispatch::Unroutable(RequestId::new(4242))
        );
    }

    #[tokio::test]
    async fn test_bridge_is_a_host_channel() {
        let harness = Harness::new();
        let channel: &dyn HostChannel = harness.bridge.as_ref();

        let reply = harness.bridge.call("mathPlugin", "add", vec![json!(1.5), json!(2)]);
        let batch = channel.drain();
        assert_eq!(batch.len(), 1);

        let response = json!({
            "type": "logos_response",
            "requestId": batch[0].request_id(),
            "result": 3.5
        });
        assert_eq!(channel.deliver(&response), Dispatch::Resolved(reply.request_id()));
        assert_eq!(reply.typed::<f64>().await.unwrap(), 3.5);
    }

    #[tokio::test]
    async fn test_idle_pump_reports_nothing() {
        let harness = Harness::new();
        let report = harness.pump().await;
        assert!(report.is_idle());
        assert_eq!(harness.bridge.metrics().outbox_drained, 0);
    }
}
