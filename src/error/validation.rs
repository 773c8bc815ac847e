use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Event channel capacity must be >= 1.")]
    ZeroChannelCapacity,
    #[error("Event channel capacity {capacity} exceeds the maximum of {max}.")]
    ChannelCapacityTooLarge { capacity: usize, max: usize },
    #[error("Pacing range is inverted: min {min_ms}ms > max {max_ms}ms.")]
    PacingRangeInverted { min_ms: u128, max_ms: u128 },
    #[error("Shutdown grace timeout must be > 0.")]
    ZeroShutdownGrace,
    #[error("Progress interval must be > 0.")]
    ZeroProgressInterval,
    #[error("Spawn rate must be >= 1 user per second.")]
    ZeroSpawnRate,
    #[error("Scenario must include at least one step.")]
    EmptyScenario,
    #[error("Invalid boolean '{value}'.")]
    InvalidBoolean { value: String },
    #[error("Invalid HTTP method '{value}'.")]
    InvalidMethod { value: String },
}
