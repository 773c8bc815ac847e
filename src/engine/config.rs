use std::time::Duration;

use crate::error::ValidationError;
use crate::metrics::MAX_CHANNEL_CAPACITY;

use super::{FailurePolicy, Pacing, RampSchedule};

pub const MIN_DEFAULT_CHANNEL_CAPACITY: usize = 1024;
pub const MAX_DEFAULT_CHANNEL_CAPACITY: usize = 1_048_576;
/// Seconds of estimated peak throughput the default channel can absorb.
const CHANNEL_BURST_SECS: f64 = 5.0;
/// Pacing floor used when estimating per-user request rate.
const MIN_ESTIMATED_PACING: Duration = Duration::from_millis(10);

/// Everything the engine needs to drive one run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub target_users: u64,
    pub ramp_up: Duration,
    /// Stop automatically once this much time has passed since `start`.
    pub max_run_duration: Option<Duration>,
    pub pacing: Pacing,
    /// Event channel capacity; sized from the expected load when unset.
    pub channel_capacity: Option<usize>,
    pub failure_policy: FailurePolicy,
    /// How long users get to exit after shutdown before being aborted.
    pub shutdown_grace: Duration,
    pub progress_interval: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_users: 1,
            ramp_up: Duration::ZERO,
            max_run_duration: None,
            pacing: Pacing::default(),
            channel_capacity: None,
            failure_policy: FailurePolicy::default(),
            shutdown_grace: Duration::from_secs(5),
            progress_interval: None,
        }
    }
}

impl RunConfig {
    /// # Errors
    ///
    /// Returns the first invalid setting found: a channel capacity outside
    /// `1..=MAX_CHANNEL_CAPACITY`, an inverted pacing range, a zero grace
    /// timeout or a zero progress interval.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.channel_capacity {
            Some(0) => return Err(ValidationError::ZeroChannelCapacity),
            Some(capacity) if capacity > MAX_CHANNEL_CAPACITY => {
                return Err(ValidationError::ChannelCapacityTooLarge {
                    capacity,
                    max: MAX_CHANNEL_CAPACITY,
                });
            }
            Some(_) | None => {}
        }
        self.pacing.validate()?;
        if self.shutdown_grace.is_zero() {
            return Err(ValidationError::ZeroShutdownGrace);
        }
        if self.progress_interval.is_some_and(|interval| interval.is_zero()) {
            return Err(ValidationError::ZeroProgressInterval);
        }
        Ok(())
    }

    #[must_use]
    pub const fn schedule(&self) -> RampSchedule {
        RampSchedule::new(self.target_users, self.ramp_up)
    }

    /// Configured capacity, or roughly five seconds of peak event rate.
    #[must_use]
    pub fn effective_channel_capacity(&self) -> usize {
        if let Some(capacity) = self.channel_capacity {
            return capacity;
        }
        let pacing = self.pacing.min_delay().max(MIN_ESTIMATED_PACING);
        let per_user_rate = 1.0 / pacing.as_secs_f64();
        let estimate = self.target_users as f64 * per_user_rate * CHANNEL_BURST_SECS;
        let bounded = estimate.clamp(
            MIN_DEFAULT_CHANNEL_CAPACITY as f64,
            MAX_DEFAULT_CHANNEL_CAPACITY as f64,
        );
        bounded.ceil() as usize
    }
}
