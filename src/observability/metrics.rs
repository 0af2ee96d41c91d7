//! Metrics collection.
//!
//! # Metrics
//! - `bundle_relay_bundles_submitted_total` (counter)
//! - `bundle_relay_bundle_transactions` (histogram): transactions per bundle
//! - `bundle_relay_bundle_outcomes_total` (counter): by `outcome`
//! - `bundle_relay_token_refreshes_total` (counter): by `result`
//! - `bundle_relay_confirmation_seconds` (histogram)

use std::time::Duration;

/// Record a bundle handed to the relay.
pub fn record_bundle_submitted(transactions: usize) {
    metrics::counter!("bundle_relay_bundles_submitted_total").increment(1);
    metrics::histogram!("bundle_relay_bundle_transactions").record(transactions as f64);
}

/// Record the terminal outcome of a confirmation.
pub fn record_bundle_outcome(outcome: &'static str) {
    metrics::counter!("bundle_relay_bundle_outcomes_total", "outcome" => outcome).increment(1);
}

/// Record one access-token refresh attempt.
pub fn record_token_refresh(success: bool) {
    let result = if success { "ok" } else { "error" };
    metrics::counter!("bundle_relay_token_refreshes_total", "result" => result).increment(1);
}

/// Record time from confirmation start to a terminal state.
pub fn record_confirmation_latency(elapsed: Duration) {
    metrics::histogram!("bundle_relay_confirmation_seconds").record(elapsed.as_secs_f64());
}
