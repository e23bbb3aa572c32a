//! Command span helpers.
//!
//! One span per handled command, with the outcome filled in at the end.

use tracing::Span;

/// Start a span for one command.
///
/// The `command.outcome` field is declared empty and filled by
/// [`record_outcome`].
pub fn start_command_span(command: &str, caller_is_admin: bool) -> Span {
    tracing::info_span!(
        "ledger.command",
        "command.name" = command,
        "caller.admin" = caller_is_admin,
        "command.outcome" = tracing::field::Empty,
    )
}

/// Record how the command ended ("ok" or an error kind).
pub fn record_outcome(span: &Span, outcome: &str) {
    span.record("command.outcome", outcome);
    span.in_scope(|| {
        tracing::debug!(outcome = outcome, "command finished");
    });
}
