use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("aggregator closed: the run summary has already been published")]
    AggregatorClosed,
    #[error("Histogram error during {context}: {message}")]
    Histogram {
        context: &'static str,
        message: String,
    },
}
