//! Configuration loading and merging with the command line.
//!
//! Precedence: explicit CLI flags, then the config file, then defaults.
mod apply;
mod loader;
mod parse;
mod plan;
pub mod types;

#[cfg(test)]
mod tests;

pub use apply::apply_config;
pub use loader::{DEFAULT_CONFIG_FILES, load_config, load_config_file};
pub use plan::{RunPlan, build_plan};

pub(crate) use parse::parse_duration_value;
