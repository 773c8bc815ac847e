use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::MetricsError;

use super::stats::duration_to_us;
use super::{
    DataQuality, EventReceiver, LatencyHistogram, RequestOutcome, RunSummary, RunningStats,
};

/// Progress ticks are pushed out this far when disabled.
const IDLE_TICK: Duration = Duration::from_secs(3600);

/// Sole writer of a run's statistics.
///
/// Feed it with [`Aggregator::update`] (or let [`Aggregator::consume`] drain
/// an event channel), then call [`Aggregator::finalize`] once. After that the
/// published summary is frozen and further updates are rejected.
#[derive(Debug)]
pub struct Aggregator {
    stats: RunningStats,
    histogram: Option<LatencyHistogram>,
    published: Option<Arc<RunSummary>>,
    progress_interval: Option<Duration>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        let histogram = match LatencyHistogram::new() {
            Ok(histogram) => Some(histogram),
            Err(err) => {
                warn!("Failed to initialize latency histogram: {}", err);
                None
            }
        };

        Self {
            stats: RunningStats::new(),
            histogram,
            published: None,
            progress_interval: None,
        }
    }

    /// Logs running totals every `interval` while consuming.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: Option<Duration>) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Folds one outcome into the running statistics.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::AggregatorClosed`] once the summary has been
    /// published; the summary is left untouched.
    pub fn update(&mut self, outcome: &RequestOutcome) -> Result<(), MetricsError> {
        if self.published.is_some() {
            return Err(MetricsError::AggregatorClosed);
        }

        self.stats.record(outcome);
        if let Some(histogram) = self.histogram.as_mut()
            && let Err(err) = histogram.record(duration_to_us(outcome.duration()))
        {
            warn!("Dropping latency histogram after record failure: {}", err);
            self.histogram = None;
        }
        Ok(())
    }

    /// Merges a shard-local aggregator into this one.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::AggregatorClosed`] if either side has already
    /// been finalized.
    pub fn merge(&mut self, other: &Aggregator) -> Result<(), MetricsError> {
        if self.published.is_some() || other.published.is_some() {
            return Err(MetricsError::AggregatorClosed);
        }

        self.stats.merge(&other.stats);
        self.histogram = match (self.histogram.take(), other.histogram.as_ref()) {
            (Some(mut mine), Some(theirs)) => match mine.merge(theirs) {
                Ok(()) => Some(mine),
                Err(err) => {
                    warn!("Dropping latency histogram after merge failure: {}", err);
                    None
                }
            },
            (Some(_), None) | (None, Some(_)) | (None, None) => None,
        };
        Ok(())
    }

    /// Produces the immutable summary and closes the aggregator.
    ///
    /// `stopped_at` closes the measurement window that started at the first
    /// observed event.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::AggregatorClosed`] if a summary was already
    /// published.
    pub fn finalize(
        &mut self,
        stopped_at: Instant,
        quality: DataQuality,
    ) -> Result<Arc<RunSummary>, MetricsError> {
        if self.published.is_some() {
            return Err(MetricsError::AggregatorClosed);
        }

        self.stats.mark_stopped(stopped_at);
        let percentiles = self
            .histogram
            .as_ref()
            .map(LatencyHistogram::percentiles)
            .unwrap_or_default();
        let summary = Arc::new(self.stats.summarize(percentiles, quality));
        self.published = Some(Arc::clone(&summary));
        Ok(summary)
    }

    #[must_use]
    pub const fn stats(&self) -> &RunningStats {
        &self.stats
    }

    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.published.is_some()
    }

    /// The published summary, if `finalize` has run.
    #[must_use]
    pub fn summary(&self) -> Option<Arc<RunSummary>> {
        self.published.clone()
    }

    /// Drains `events` until every sender is gone and the queue is empty,
    /// then hands the aggregator back for finalization.
    pub async fn consume(mut self, mut events: EventReceiver) -> Self {
        let period = self.progress_interval.unwrap_or(IDLE_TICK);
        let first_tick = Instant::now()
            .checked_add(period)
            .unwrap_or_else(Instant::now);
        let mut progress = tokio::time::interval_at(first_tick, period);
        progress.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let progress_enabled = self.progress_interval.is_some();

        loop {
            tokio::select! {
                maybe_outcome = events.recv() => {
                    let Some(outcome) = maybe_outcome else {
                        break;
                    };
                    if let Err(err) = self.update(&outcome) {
                        warn!("Stopping event consumption: {}", err);
                        events.close();
                        break;
                    }
                },
                _ = progress.tick(), if progress_enabled => {
                    info!(
                        total = self.stats.total_requests(),
                        success = self.stats.success_requests(),
                        failure = self.stats.failure_requests(),
                        dropped = events.dropped_events(),
                        "progress"
                    );
                }
            }
        }

        debug!(
            total = self.stats.total_requests(),
            "Event channel drained."
        );
        self
    }
}
