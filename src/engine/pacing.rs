use std::time::Duration;

use rand::Rng;

use crate::error::ValidationError;

pub const DEFAULT_PACING_MIN: Duration = Duration::from_millis(1000);
pub const DEFAULT_PACING_MAX: Duration = Duration::from_millis(2500);

/// Think time a virtual user waits between consecutive requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pacing {
    None,
    Constant(Duration),
    /// Drawn uniformly from `min..=max` for every iteration.
    Uniform { min: Duration, max: Duration },
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::Uniform {
            min: DEFAULT_PACING_MIN,
            max: DEFAULT_PACING_MAX,
        }
    }
}

impl Pacing {
    /// # Errors
    ///
    /// Returns [`ValidationError::PacingRangeInverted`] when `min > max`.
    pub fn uniform(min: Duration, max: Duration) -> Result<Self, ValidationError> {
        let pacing = Pacing::Uniform { min, max };
        pacing.validate()?;
        Ok(pacing)
    }

    /// Builds pacing from optional bounds. A missing bound takes its default,
    /// moved to the given bound when the default would invert the range.
    /// Equal bounds give constant pacing.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PacingRangeInverted`] when both bounds are
    /// given and `min > max`.
    pub fn from_bounds(
        min: Option<Duration>,
        max: Option<Duration>,
    ) -> Result<Self, ValidationError> {
        let (min, max) = match (min, max) {
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) => (min, DEFAULT_PACING_MAX.max(min)),
            (None, Some(max)) => (DEFAULT_PACING_MIN.min(max), max),
            (None, None) => (DEFAULT_PACING_MIN, DEFAULT_PACING_MAX),
        };
        if min == max {
            Ok(Pacing::Constant(min))
        } else {
            Pacing::uniform(min, max)
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::PacingRangeInverted`] for a uniform range
    /// whose lower bound exceeds its upper bound.
    pub fn validate(self) -> Result<(), ValidationError> {
        match self {
            Pacing::Uniform { min, max } if min > max => Err(ValidationError::PacingRangeInverted {
                min_ms: min.as_millis(),
                max_ms: max.as_millis(),
            }),
            Pacing::None | Pacing::Constant(_) | Pacing::Uniform { .. } => Ok(()),
        }
    }

    /// Shortest delay this pacing can produce.
    #[must_use]
    pub const fn min_delay(self) -> Duration {
        match self {
            Pacing::None => Duration::ZERO,
            Pacing::Constant(delay) => delay,
            Pacing::Uniform { min, .. } => min,
        }
    }

    #[must_use]
    pub fn sample(self) -> Duration {
        match self {
            Pacing::None => Duration::ZERO,
            Pacing::Constant(delay) => delay,
            Pacing::Uniform { min, max } if min >= max => min,
            Pacing::Uniform { min, max } => rand::thread_rng().gen_range(min..=max),
        }
    }
}
