//! Command-line interface of the `volley` binary.
mod cli;
pub(crate) mod parsers;


pub use cli::LoadArgs;
pub use parsers::{parse_bool_env, parse_duration_arg, parse_method};
