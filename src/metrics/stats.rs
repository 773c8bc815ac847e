use std::time::Duration;

use tokio::time::Instant;

use super::{DataQuality, LatencyPercentiles, RequestOutcome, RunSummary};

/// Running totals for one run.
///
/// Owned by exactly one writer (the aggregator). Counters only ever grow,
/// and `total == success + failure` holds after every `record`.
/// Latencies are kept as whole microseconds so sums stay exact and the
/// result does not depend on the order events arrive in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunningStats {
    total_requests: u64,
    success_requests: u64,
    failure_requests: u64,
    sum_latency_us: u128,
    max_latency_us: u64,
    min_latency_us: u64,
    sum_bytes: u64,
    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_requests: 0,
            success_requests: 0,
            failure_requests: 0,
            sum_latency_us: 0,
            max_latency_us: 0,
            min_latency_us: u64::MAX,
            sum_bytes: 0,
            started_at: None,
            stopped_at: None,
        }
    }

    /// Folds one outcome into the totals in O(1).
    pub fn record(&mut self, outcome: &RequestOutcome) {
        let latency_us = duration_to_us(outcome.duration());

        self.total_requests = self.total_requests.saturating_add(1);
        if outcome.succeeded() {
            self.success_requests = self.success_requests.saturating_add(1);
            self.sum_bytes = self.sum_bytes.saturating_add(outcome.response_bytes());
        } else {
            self.failure_requests = self.failure_requests.saturating_add(1);
        }

        self.sum_latency_us = self.sum_latency_us.saturating_add(u128::from(latency_us));
        self.max_latency_us = self.max_latency_us.max(latency_us);
        self.min_latency_us = self.min_latency_us.min(latency_us);

        let timestamp = outcome.timestamp();
        self.started_at = Some(
            self.started_at
                .map_or(timestamp, |started| started.min(timestamp)),
        );
    }

    /// Combines shard-local totals: sums add, minimum of minimums, maximum of
    /// maximums, earliest start, latest stop.
    pub fn merge(&mut self, other: &RunningStats) {
        self.total_requests = self.total_requests.saturating_add(other.total_requests);
        self.success_requests = self
            .success_requests
            .saturating_add(other.success_requests);
        self.failure_requests = self
            .failure_requests
            .saturating_add(other.failure_requests);
        self.sum_latency_us = self.sum_latency_us.saturating_add(other.sum_latency_us);
        self.max_latency_us = self.max_latency_us.max(other.max_latency_us);
        self.min_latency_us = self.min_latency_us.min(other.min_latency_us);
        self.sum_bytes = self.sum_bytes.saturating_add(other.sum_bytes);
        self.started_at = earliest(self.started_at, other.started_at);
        self.stopped_at = latest(self.stopped_at, other.stopped_at);
    }

    pub(crate) fn mark_stopped(&mut self, at: Instant) {
        self.stopped_at = latest(self.stopped_at, Some(at));
    }

    #[must_use]
    pub const fn total_requests(&self) -> u64 {
        self.total_requests
    }

    #[must_use]
    pub const fn success_requests(&self) -> u64 {
        self.success_requests
    }

    #[must_use]
    pub const fn failure_requests(&self) -> u64 {
        self.failure_requests
    }

    #[must_use]
    pub const fn sum_bytes(&self) -> u64 {
        self.sum_bytes
    }

    #[must_use]
    pub const fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    #[must_use]
    pub const fn stopped_at(&self) -> Option<Instant> {
        self.stopped_at
    }

    /// Minimum latency, or `None` before the first event (the sentinel).
    #[must_use]
    pub fn min_latency(&self) -> Option<Duration> {
        (self.total_requests > 0).then(|| Duration::from_micros(self.min_latency_us))
    }

    #[must_use]
    pub fn max_latency(&self) -> Option<Duration> {
        (self.total_requests > 0).then(|| Duration::from_micros(self.max_latency_us))
    }

    /// Window used for rates: stop minus start, or one second when no event
    /// was ever seen.
    #[must_use]
    pub fn window_secs(&self) -> f64 {
        match self.started_at {
            Some(started) => self
                .stopped_at
                .map_or(0.0, |stopped| {
                    stopped.saturating_duration_since(started).as_secs_f64()
                }),
            None => 1.0,
        }
    }

    pub(crate) fn summarize(
        &self,
        percentiles: LatencyPercentiles,
        quality: DataQuality,
    ) -> RunSummary {
        let total = self.total_requests;
        let duration_secs = self.window_secs();

        let avg_latency_ms = ratio(us_to_ms_u128(self.sum_latency_us), total as f64);
        let error_rate = ratio(self.failure_requests as f64, total as f64);
        let (min_latency_ms, max_latency_ms) = if total > 0 {
            (
                us_to_ms(self.min_latency_us),
                us_to_ms(self.max_latency_us),
            )
        } else {
            (0.0, 0.0)
        };

        RunSummary {
            total_requests: total,
            success_requests: self.success_requests,
            failure_requests: self.failure_requests,
            avg_latency_ms,
            max_latency_ms,
            min_latency_ms,
            p50_latency_ms: percentiles.p50_ms,
            p90_latency_ms: percentiles.p90_ms,
            p99_latency_ms: percentiles.p99_ms,
            error_rate,
            throughput_per_sec: ratio(self.success_requests as f64, duration_secs),
            data_rate_bytes_per_sec: ratio(self.sum_bytes as f64, duration_secs),
            total_bytes: self.sum_bytes,
            duration_secs,
            availability: 1.0 - error_rate,
            dropped_events: quality.dropped_events,
            forced_shutdown: quality.forced_shutdown,
        }
    }
}

pub(crate) fn duration_to_us(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn us_to_ms(value: u64) -> f64 {
    value as f64 / 1000.0
}

fn us_to_ms_u128(value: u128) -> f64 {
    value as f64 / 1000.0
}

fn earliest(left: Option<Instant>, right: Option<Instant>) -> Option<Instant> {
    match (left, right) {
        (Some(left), Some(right)) => Some(left.min(right)),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

fn latest(left: Option<Instant>, right: Option<Instant>) -> Option<Instant> {
    match (left, right) {
        (Some(left), Some(right)) => Some(left.max(right)),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}
