//! Load driver: virtual users, their scheduler and the run lifecycle.
mod config;
mod controller;
mod executor;
mod failure;
mod pacing;
mod pool;
mod schedule;


use std::fmt;

pub use config::{MAX_DEFAULT_CHANNEL_CAPACITY, MIN_DEFAULT_CHANNEL_CAPACITY, RunConfig};
pub use controller::RunController;
pub use executor::{ExecutorContext, ScenarioExecutor};
pub use failure::FailurePolicy;
pub use pacing::{DEFAULT_PACING_MAX, DEFAULT_PACING_MIN, Pacing};
pub use pool::{PoolReport, UserPool};
pub use schedule::RampSchedule;

/// Lifecycle of a [`RunController`]. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Stopping,
    Finalized,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Stopping => "stopping",
            RunState::Finalized => "finalized",
        };
        f.write_str(name)
    }
}
