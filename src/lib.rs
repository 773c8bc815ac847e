//! Core library for the `volley` load generator.
//!
//! The engine drives a population of virtual users against a target over an
//! abstract [`http::HttpCapability`], streams one outcome event per request
//! into a single aggregator and publishes an immutable
//! [`metrics::RunSummary`] when the run is stopped. The `volley` binary is a
//! thin layer over [`engine::RunController`].
pub mod args;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod scenario;
pub mod shutdown;
pub mod sinks;
