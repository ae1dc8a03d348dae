//! # Logos Bridge Benchmarks
//!
//! | Path | Operation | Target |
//! |------|-----------|--------|
//! | Correlator | issue + resolve one call | < 10µs |
//! | Outbox | drain a batch of requests | < 1µs per request |
//! | Demultiplexer | classify + route raw text | < 10µs |
//! | Event hub | fan out to N subscribers | linear in N |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use logos_bridge::{Bridge, BridgeConfig, InboundMessage, Listener};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn bridge() -> Bridge {
    Bridge::new(BridgeConfig::default()).unwrap()
}

// ============================================================================
// Call round trip
// ============================================================================

fn bench_call_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("call-round-trip");
    group.measurement_time(Duration::from_secs(5));

    let bridge = bridge();
    group.bench_function("issue_drain_resolve", |b| {
        b.iter(|| {
            let reply = bridge.call("mathPlugin", "add", vec![json!(2), json!(3)]);
            let id = reply.request_id();
            black_box(bridge.drain());
            let response = InboundMessage::response(id, json!(5)).to_json();
            black_box(bridge.handle_message(&response))
        })
    });

    group.bench_function("handle_raw_response", |b| {
        b.iter(|| {
            let reply = bridge.call("mathPlugin", "add", vec![json!(2), json!(3)]);
            bridge.drain();
            let text = format!(
                r#"{{"type":"logos_response","requestId":{},"result":5}}"#,
                reply.request_id()
            );
            black_box(bridge.handle_raw(&text))
        })
    });

    group.finish();
}

// ============================================================================
// Outbox drain
// ============================================================================

fn bench_outbox_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("outbox-drain");

    for size in [1usize, 16, 128, 1024] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("drain_json", size), &size, |b, &size| {
            let bridge = bridge();
            b.iter(|| {
                for i in 0..size {
                    bridge.call("counter", "increment", vec![json!(i)]);
                }
                black_box(bridge.drain_json())
            });
            bridge.shutdown();
        });
    }

    group.finish();
}

// ============================================================================
// Event fan-out
// ============================================================================

fn bench_event_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("event-fan-out");

    for subscribers in [1usize, 10, 100] {
        let bridge = bridge();
        let hits = Arc::new(AtomicU64::new(0));
        for _ in 0..subscribers {
            let hits = Arc::clone(&hits);
            bridge.events().subscribe(
                "countChanged",
                Listener::from_fn(move |_| {
                    hits.fetch_add(1, Ordering::Relaxed);
                }),
            );
        }
        let event = InboundMessage::event("countChanged", json!({"count": 1})).to_json();

        group.throughput(Throughput::Elements(subscribers as u64));
        group.bench_with_input(
            BenchmarkId::new("dispatch", subscribers),
            &event,
            |b, event| b.iter(|| black_box(bridge.handle_message(event))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_call_round_trip,
    bench_outbox_drain,
    bench_event_fan_out
);
criterion_main!(benches);
