//! # Event Flow
//!
//! Host-originated notifications fanned out through the facade's
//! subscription methods.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use logos_bridge::{
        BridgeConfig, Dispatch, FacadeProperty, InboundMessage, Listener, RemoteModule,
    };
    use logos_host::modules::COUNT_CHANGED;
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    use crate::harness::Harness;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> Listener {
        let log = Arc::clone(log);
        Listener::from_fn(move |_| log.lock().push(tag.to_string()))
    }

    #[tokio::test]
    async fn test_counter_events_follow_their_responses() {
        let harness = Harness::new();
        let seen = Arc::new(Mutex::new(Vec::<Value>::new()));
        {
            let seen = Arc::clone(&seen);
            harness
                .facade
                .on(COUNT_CHANGED, Listener::from_fn(move |data| seen.lock().push(data.clone())));
        }

        let increment = harness.facade.module("counter").get("increment").unwrap();
        let first = increment.call(vec![]);
        let second = increment.call(vec![]);

        let report = harness.pump().await;
        assert_eq!(report.requests, 2);
        assert_eq!(report.events, 2);

        assert_eq!(first.await.unwrap(), json!(1));
        assert_eq!(second.await.unwrap(), json!(2));
        assert_eq!(*seen.lock(), vec![json!({"count": 1}), json!({"count": 2})]);
    }

    #[tokio::test]
    async fn test_subscribers_run_in_registration_order() {
        let (facade, bridge) = Harness::bridge_only(BridgeConfig::default());
        let log = Arc::new(Mutex::new(Vec::new()));
        facade.on("tick", recorder(&log, "first"));
        facade.on("tick", recorder(&log, "second"));
        facade.on("other", recorder(&log, "other"));

        let dispatch = bridge.handle_message(&InboundMessage::event("tick", json!(1)).to_json());
        assert_eq!(
            dispatch,
            Dispatch::Event {
                event_name: "tick".into(),
                delivered: 2,
                faults: 0
            }
        );
        assert_eq!(*log.lock(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_event_without_subscribers_is_dropped() {
        let (_facade, bridge) = Harness::bridge_only(BridgeConfig::default());
        let dispatch = bridge.handle_message(&json!({"type": "logos_event", "eventName": "nobody"}));
        assert_eq!(
            dispatch,
            Dispatch::Event {
                event_name: "nobody".into(),
                delivered: 0,
                faults: 0
            }
        );
        assert_eq!(bridge.metrics().events_dispatched, 1);
    }

    #[tokio::test]
    async fn test_removal_mid_dispatch_does_not_affect_current_fan_out() {
        let (facade, bridge) = Harness::bridge_only(BridgeConfig::default());
        let log = Arc::new(Mutex::new(Vec::new()));

        let b = recorder(&log, "B");
        let a = {
            let log = Arc::clone(&log);
            let facade = facade.clone();
            let b = b.clone();
            Listener::from_fn(move |_| {
                log.lock().push("A".to_string());
                facade.remove_listener("e", &b);
            })
        };
        let c = recorder(&log, "C");

        facade.on("e", a);
        facade.on("e", b);
        facade.on("e", c);

        let event = InboundMessage::event("e", Value::Null).to_json();
        bridge.handle_message(&event);
        assert_eq!(*log.lock(), vec!["A", "B", "C"]);

        log.lock().clear();
        bridge.handle_message(&event);
        assert_eq!(*log.lock(), vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_failing_subscriber_does_not_block_others() {
        let (facade, bridge) = Harness::bridge_only(BridgeConfig::default());
        let hits = Arc::new(AtomicUsize::new(0));

        facade.on("e", Listener::new(|_| Err("listener refused".into())));
        facade.on("e", Listener::from_fn(|_| panic!("listener exploded")));
        {
            let hits = Arc::clone(&hits);
            facade.on(
                "e",
                Listener::from_fn(move |_| {
                    hits.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }

        let dispatch = bridge.handle_message(&InboundMessage::event("e", json!({})).to_json());
        assert_eq!(
            dispatch,
            Dispatch::Event {
                event_name: "e".into(),
                delivered: 3,
                faults: 2
            }
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(bridge.metrics().subscriber_faults, 2);
    }

    #[tokio::test]
    async fn test_duplicate_registration_fires_twice_and_removes_once() {
        let (facade, bridge) = Harness::bridge_only(BridgeConfig::default());
        let hits = Arc::new(AtomicUsize::new(0));
        let listener = {
            let hits = Arc::clone(&hits);
            Listener::from_fn(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };

        facade.on("e", listener.clone());
        facade.on("e", listener.clone());
        let event = InboundMessage::event("e", Value::Null).to_json();
        bridge.handle_message(&event);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        assert!(facade.remove_listener("e", &listener));
        bridge.handle_message(&event);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_remove_unknown_listener_is_a_no_op() {
        let (facade, _bridge) = Harness::bridge_only(BridgeConfig::default());
        let stranger = Listener::from_fn(|_| {});
        assert!(!facade.remove_listener("never-registered", &stranger));
        assert_eq!(facade.remove_all_listeners("never-registered"), 0);
    }

    #[tokio::test]
    async fn test_remove_all_listeners_scopes_to_one_event() {
        let (facade, bridge) = Harness::bridge_only(BridgeConfig::default());
        let log = Arc::new(Mutex::new(Vec::new()));
        facade.on("a", recorder(&log, "a1"));
        facade.on("a", recorder(&log, "a2"));
        facade.on("b", recorder(&log, "b1"));

        assert_eq!(facade.remove_all_listeners("a"), 2);
        bridge.handle_message(&InboundMessage::event("a", Value::Null).to_json());
        bridge.handle_message(&InboundMessage::event("b", Value::Null).to_json());
        assert_eq!(*log.lock(), vec!["b1"]);
    }

    #[tokio::test]
    async fn test_own_properties_shadow_modules() {
        let (facade, bridge) = Harness::bridge_only(BridgeConfig::default());

        assert!(matches!(facade.get("on"), Some(FacadeProperty::On)));
        assert!(matches!(facade.get("removeListener"), Some(FacadeProperty::RemoveListener)));
        assert!(matches!(
            facade.get("removeAllListeners"),
            Some(FacadeProperty::RemoveAllListeners)
        ));
        match facade.get("counter") {
            Some(FacadeProperty::Module(proxy)) => assert_eq!(proxy.name(), "counter"),
            other => panic!("expected module proxy, got {:?}", other),
        }
        assert!(bridge.drain().is_empty());
    }
}
