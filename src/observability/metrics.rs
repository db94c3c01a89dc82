//! Metrics collection.
//!
//! # Metrics
//! - `ledger_rpc_calls_total` (counter): remote calls by method, outcome
//! - `ledger_rpc_call_duration_seconds` (histogram): call latency by method
//! - `ledger_rpc_connections_total` (counter): connections dialed
//! - `ledger_transactions_submitted_total` (counter): submission attempts
//!
//! # Design Decisions
//! - Uses the `metrics` facade only; installing an exporter is left to the
//!   host application
//! - Without a recorder every call is a no-op

use std::time::Instant;

/// Record one finished remote call.
pub fn record_rpc_call(method: &str, outcome: &'static str, started: Instant) {
    ::metrics::counter!(
        "ledger_rpc_calls_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!("ledger_rpc_call_duration_seconds", "method" => method.to_string())
        .record(started.elapsed().as_secs_f64());
}

/// Record a newly dialed connection.
pub fn record_connection_created(endpoint: &str) {
    ::metrics::counter!("ledger_rpc_connections_total", "endpoint" => endpoint.to_string())
        .increment(1);
}

/// Record a transaction submission attempt.
pub fn record_submission() {
    ::metrics::counter!("ledger_transactions_submitted_total").increment(1);
}
