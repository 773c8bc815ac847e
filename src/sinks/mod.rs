//! Destinations for the final run summary.
mod format;
mod record;
mod writers;


use async_trait::async_trait;
use tracing::error;

use crate::error::SinkError;
use crate::metrics::RunSummary;

pub use record::SummaryRecord;
pub use writers::{ConsoleSink, JsonFileSink};

/// Receives the published summary once a run is finalized.
#[async_trait]
pub trait SummarySink: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the summary cannot be serialized or written.
    async fn write(&self, summary: &RunSummary) -> Result<(), SinkError>;
}

/// Hands the summary to every sink, continuing past failures.
///
/// # Errors
///
/// Returns the first sink error after all sinks have been tried.
pub async fn write_sinks(
    sinks: &[Box<dyn SummarySink>],
    summary: &RunSummary,
) -> Result<(), SinkError> {
    let mut first_error = None;
    for sink in sinks {
        if let Err(err) = sink.write(summary).await {
            error!("Summary sink failed: {}", err);
            if first_error.is_none() {
                first_error = Some(err);
            }
        }
    }
    first_error.map_or(Ok(()), Err)
}
