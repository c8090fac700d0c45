//! Client-side request metrics
//!
//! Emitted through the `metrics` facade; they are no-ops until the binary
//! installs a recorder.
//!
//! - `client_requests_total` (counter): labels `method`, `status`
//! - `client_request_duration_seconds` (histogram): label `method`
//! - `client_transport_errors_total` (counter): labels `method`, `kind`
//! - `client_token_refresh_total` (counter): label `outcome`

use std::time::Duration;

pub const REQUEST_DURATION_METRIC: &str = "client_request_duration_seconds";

/// Record one completed HTTP exchange.
pub fn record_request(method: &str, status: u16, elapsed: Duration) {
    metrics::counter!(
        "client_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(REQUEST_DURATION_METRIC, "method" => method.to_string())
        .record(elapsed.as_secs_f64());
}

/// Record a request that never produced a response.
pub fn record_transport_error(method: &str, kind: &'static str) {
    metrics::counter!(
        "client_transport_errors_total",
        "method" => method.to_string(),
        "kind" => kind
    )
    .increment(1);
}

/// Record a refresh attempt: `success`, `failure`, `missing` or `shared`.
pub fn record_refresh(outcome: &'static str) {
    metrics::counter!("client_token_refresh_total", "outcome" => outcome).increment(1);
}
