use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// One completed request attempt, as reported by a virtual user.
///
/// Built once right after the request finishes and never changed afterwards;
/// a failed attempt always carries zero response bytes.
#[derive(Clone, Debug)]
pub struct RequestOutcome {
    timestamp: Instant,
    duration: Duration,
    response_bytes: u64,
    succeeded: bool,
    label: Arc<str>,
}

impl RequestOutcome {
    #[must_use]
    pub const fn success(
        label: Arc<str>,
        timestamp: Instant,
        duration: Duration,
        response_bytes: u64,
    ) -> Self {
        Self {
            timestamp,
            duration,
            response_bytes,
            succeeded: true,
            label,
        }
    }

    #[must_use]
    pub const fn failure(label: Arc<str>, timestamp: Instant, duration: Duration) -> Self {
        Self {
            timestamp,
            duration,
            response_bytes: 0,
            succeeded: false,
            label,
        }
    }

    /// Completion instant of the request.
    #[must_use]
    pub const fn timestamp(&self) -> Instant {
        self.timestamp
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub const fn response_bytes(&self) -> u64 {
        self.response_bytes
    }

    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.succeeded
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Run-level data quality flags attached to the summary at finalize time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DataQuality {
    /// Outcome events lost because the event channel was full or closed.
    pub dropped_events: u64,
    /// True when stragglers had to be aborted after the shutdown grace period.
    pub forced_shutdown: bool,
}

/// Immutable result of a run.
///
/// Every floating-point field is finite: empty runs and zero-length windows
/// report zeros instead of NaN or infinity.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub total_requests: u64,
    pub success_requests: u64,
    pub failure_requests: u64,
    pub avg_latency_ms: f64,
    pub max_latency_ms: f64,
    pub min_latency_ms: f64,
    pub p50_latency_ms: f64,
    pub p90_latency_ms: f64,
    pub p99_latency_ms: f64,
    pub error_rate: f64,
    pub throughput_per_sec: f64,
    pub data_rate_bytes_per_sec: f64,
    pub total_bytes: u64,
    pub duration_secs: f64,
    pub availability: f64,
    pub dropped_events: u64,
    pub forced_shutdown: bool,
}

/// Latency percentiles in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatencyPercentiles {
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p99_ms: f64,
}
