//! Smoke test for OTLP export.
//!
//! Requires an OpenTelemetry collector listening on localhost:4317.
//!
//! Run with:
//! ```sh
//! cargo test --test telemetry_smoke_test -- --ignored --nocapture
//! ```

use std::time::Duration;

use opentelemetry::KeyValue;
use reward_tracker::auth::{AdminGate, CallerId};
use reward_tracker::storage::LedgerStore;
use reward_tracker::telemetry::{TelemetryConfig, init_telemetry, metrics};
use reward_tracker::tracker::Tracker;

#[test]
#[ignore]
fn smoke_command_signals() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let guard = init_telemetry(TelemetryConfig {
            endpoint: Some("http://localhost:4317".to_string()),
            service_name: "reward-tracker-smoke-test".to_string(),
            default_filter: "debug".to_string(),
        })
        .expect("failed to init telemetry");

        // Real commands emit the span, counter, histogram and write metrics.
        let dir = tempfile::TempDir::new().unwrap();
        let tracker = Tracker::new(
            LedgerStore::open(dir.path().join("data.json")),
            AdminGate::new(CallerId(1)),
        );
        tracker.handle_line(CallerId(1), "/add smoke 3").unwrap();
        tracker.handle_line(CallerId(2), "/add smoke 3").unwrap_err();
        tracker.handle_line(CallerId(2), "/list").unwrap();

        metrics::telegram_updates().add(1, &[KeyValue::new("handled", "true")]);

        guard.force_flush();
        // Give batch exporters time to ship.
        tokio::time::sleep(Duration::from_secs(2)).await;
    });
}
