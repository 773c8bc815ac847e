use std::time::Duration;

use crate::error::ValidationError;

/// Linear ramp: user `i` of `n` starts `ramp_up * i / n` after the run starts.
///
/// Ramping 100 users over 10 seconds therefore spawns one user every 100ms.
/// A zero ramp-up starts everybody at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RampSchedule {
    target_users: u64,
    ramp_up: Duration,
}

impl RampSchedule {
    #[must_use]
    pub const fn new(target_users: u64, ramp_up: Duration) -> Self {
        Self {
            target_users,
            ramp_up,
        }
    }

    /// Ramp-up that spawns `users_per_sec` users per second until
    /// `target_users` are running.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroSpawnRate`] when the rate is zero.
    pub fn from_spawn_rate(target_users: u64, users_per_sec: u64) -> Result<Self, ValidationError> {
        let ramp_up_ms = u64::try_from(
            u128::from(target_users)
                .saturating_mul(1000)
                .checked_div(u128::from(users_per_sec))
                .ok_or(ValidationError::ZeroSpawnRate)?,
        )
        .unwrap_or(u64::MAX);
        Ok(Self::new(target_users, Duration::from_millis(ramp_up_ms)))
    }

    #[must_use]
    pub const fn target_users(&self) -> u64 {
        self.target_users
    }

    #[must_use]
    pub const fn ramp_up(&self) -> Duration {
        self.ramp_up
    }

    /// Delay from run start until user `index` (zero-based) is spawned.
    #[must_use]
    pub fn offset_for(&self, index: u64) -> Duration {
        let nanos = self
            .ramp_up
            .as_nanos()
            .saturating_mul(u128::from(index))
            .checked_div(u128::from(self.target_users))
            .unwrap_or(0);
        u64::try_from(nanos).map_or(self.ramp_up, Duration::from_nanos)
    }

    /// Users spawned per second while ramping; zero when there is no ramp.
    #[must_use]
    pub fn spawn_rate(&self) -> f64 {
        let secs = self.ramp_up.as_secs_f64();
        if secs > 0.0 {
            self.target_users as f64 / secs
        } else {
            0.0
        }
    }
}
