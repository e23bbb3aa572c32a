//! Metric instrument factories for reward-tracker.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"reward-tracker"` meter.
//! Without an OTLP endpoint the global provider is a no-op.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for reward-tracker instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("reward-tracker")
}

/// Counter: commands handled.
/// Labels: `command`, `result` ("ok" or an error kind).
pub fn commands_handled() -> Counter<u64> {
    meter()
        .u64_counter("ledger.commands")
        .with_description("Number of bot commands handled")
        .build()
}

/// Counter: full ledger documents written to disk.
pub fn ledger_writes() -> Counter<u64> {
    meter()
        .u64_counter("ledger.writes")
        .with_description("Number of ledger file rewrites")
        .build()
}

/// Histogram: command duration in milliseconds.
/// Labels: `command`.
pub fn command_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("ledger.command.duration_ms")
        .with_description("Command handling duration in milliseconds")
        .with_unit("ms")
        .build()
}

/// Counter: Telegram updates pulled from getUpdates.
/// Labels: `handled` ("true" | "false").
pub fn telegram_updates() -> Counter<u64> {
    meter()
        .u64_counter("telegram.updates")
        .with_description("Number of Telegram updates received")
        .build()
}
