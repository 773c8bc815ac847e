use serde::{Deserialize, Serialize};

use crate::metrics::RunSummary;

use super::format::round4;

/// Flat, serialisable view of a [`RunSummary`].
///
/// Latencies are milliseconds, rates are per second, sizes are bytes. Every
/// float is rounded to four decimals and is always finite.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub total_requests: u64,
    pub success_requests: u64,
    pub failure_requests: u64,
    pub avg_response_time: f64,
    pub max_response_time: f64,
    pub min_response_time: f64,
    pub p50_response_time: f64,
    pub p90_response_time: f64,
    pub p99_response_time: f64,
    pub error_rate: f64,
    pub tps: f64,
    pub download_speed: f64,
    pub total_download_size: u64,
    pub total_duration: f64,
    pub availability: f64,
    pub dropped_events: u64,
    pub forced_shutdown: bool,
}

impl From<&RunSummary> for SummaryRecord {
    fn from(summary: &RunSummary) -> Self {
        Self {
            total_requests: summary.total_requests,
            success_requests: summary.success_requests,
            failure_requests: summary.failure_requests,
            avg_response_time: round4(summary.avg_latency_ms),
            max_response_time: round4(summary.max_latency_ms),
            min_response_time: round4(summary.min_latency_ms),
            p50_response_time: round4(summary.p50_latency_ms),
            p90_response_time: round4(summary.p90_latency_ms),
            p99_response_time: round4(summary.p99_latency_ms),
            error_rate: round4(summary.error_rate),
            tps: round4(summary.throughput_per_sec),
            download_speed: round4(summary.data_rate_bytes_per_sec),
            total_download_size: summary.total_bytes,
            total_duration: round4(summary.duration_secs),
            availability: round4(summary.availability),
            dropped_events: summary.dropped_events,
            forced_shutdown: summary.forced_shutdown,
        }
    }
}
