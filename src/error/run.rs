use thiserror::Error;

use crate::engine::RunState;

use super::MetricsError;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid state transition: cannot {operation} while {state}")]
    InvalidStateTransition {
        state: RunState,
        operation: &'static str,
    },
    #[error("Metrics aggregator task failed: {source}")]
    AggregatorTask {
        #[source]
        source: tokio::task::JoinError,
    },
    #[error("Failed to finalize run summary: {source}")]
    Finalize {
        #[from]
        source: MetricsError,
    },
    #[error("User pool scheduler task failed: {source}")]
    SchedulerTask {
        #[source]
        source: tokio::task::JoinError,
    },
}
