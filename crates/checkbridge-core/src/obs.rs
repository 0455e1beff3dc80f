//! Structured lifecycle events for a notification run.
//!
//! Every event carries an `event` field so log pipelines can filter on it:
//! `run.started`, `run.skipped`, `poll.completed`, `poll.no_data`,
//! `notification.sent`, `run.finished`, `status.unrecognized`.

use tracing::{debug, info, warn};

/// Span tagged with the thread key, meant to instrument a whole run.
pub fn run_span(thread_key: &str) -> tracing::Span {
    tracing::info_span!("checkbridge.run", thread_key = %thread_key)
}

pub fn emit_run_started(thread_key: &str, action: &str, head_sha: &str) {
    info!(event = "run.started", thread_key = %thread_key, action = %action, head_sha = %head_sha);
}

pub fn emit_run_skipped(reason: &dyn std::fmt::Display) {
    info!(event = "run.skipped", reason = %reason);
}

pub fn emit_poll_completed(poll: u64, overall: &str, records: usize) {
    debug!(event = "poll.completed", poll = poll, overall = %overall, records = records);
}

pub fn emit_poll_no_data(poll: u64) {
    debug!(event = "poll.no_data", poll = poll);
}

pub fn emit_notification_sent(thread_key: &str, title: &str) {
    info!(event = "notification.sent", thread_key = %thread_key, title = %title);
}

pub fn emit_run_finished(thread_key: &str, overall: &str, polls: u64, messages_sent: u64) {
    info!(
        event = "run.finished",
        thread_key = %thread_key,
        overall = %overall,
        polls = polls,
        messages_sent = messages_sent
    );
}

/// A provider string outside the known vocabulary was mapped to a default.
pub fn emit_status_unrecognized(field: &str, value: &str) {
    warn!(event = "status.unrecognized", field = %field, value = %value);
}
