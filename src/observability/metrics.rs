//! Metrics collection and exposition.
//!
//! # Metrics
//! - `firehose_requests_total{status}` (counter): delivery requests by
//!   response status
//! - `firehose_records_forwarded_total` (counter): records handed to the
//!   fluent forwarder
//! - `firehose_forward_failures_total` (counter): per-record send failures
//!   (never surfaced to the caller)

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the process-wide Prometheus recorder.
///
/// Returns `None` with an error log when a recorder is already installed;
/// the relay then serves without a /metrics endpoint instead of aborting.
pub fn install_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(error) => {
            tracing::error!(error = %error, "failed to install metrics recorder");
            None
        }
    }
}

/// Count one handled delivery request by response status.
pub fn record_request(status: u16) {
    counter!("firehose_requests_total", "status" => status.to_string()).increment(1);
}

/// Count records successfully handed to the forwarder.
pub fn record_forwarded(count: u64) {
    counter!("firehose_records_forwarded_total").increment(count);
}

/// Count per-record forward failures.
pub fn record_forward_failures(count: u64) {
    counter!("firehose_forward_failures_total").increment(count);
}
