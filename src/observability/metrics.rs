//! Metrics collection and exposition.
//!
//! # Metrics
//! - `source_requests_total` (counter): ingestion requests by status code
//! - `source_request_duration_seconds` (histogram): ingestion latency
//! - `source_events_accepted_total` (counter): events queued on the channel
//! - `source_bad_requests_total` (counter): requests rejected for malformed bodies
//! - `source_channel_rejections_total` (counter): batches refused by the channel, by reason
//! - `sink_events_written_total` (counter): events written by the sink

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(status: u16, start: Instant) {
    let status = status.to_string();
    counter!("source_requests_total", "status" => status).increment(1);
    histogram!("source_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_events_accepted(count: usize) {
    counter!("source_events_accepted_total").increment(count as u64);
}

pub fn record_bad_request() {
    counter!("source_bad_requests_total").increment(1);
}

pub fn record_channel_rejection(reason: &'static str) {
    counter!("source_channel_rejections_total", "reason" => reason).increment(1);
}

pub fn record_events_written(count: u64) {
    counter!("sink_events_written_total").increment(count);
}
