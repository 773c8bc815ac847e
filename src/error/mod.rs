mod app;
mod config;
mod http;
mod metrics;
mod run;
mod sink;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::{HttpError, TransportError};
pub use metrics::MetricsError;
pub use run::RunError;
pub use sink::SinkError;
pub use validation::ValidationError;
