use clap::Parser;
use reqwest::Method;
use std::time::Duration;

use crate::http::RequestSpec;

use super::parsers::{parse_bool_env, parse_duration_arg, parse_method};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "HTTP load generator: ramps up virtual users against a target and reports throughput, latency and error rate."
)]
pub struct LoadArgs {
    /// Base URL of the target service
    #[arg(long, short, env = "VOLLEY_URL")]
    pub url: Option<String>,

    /// Path requested by every virtual user (ignored when the config defines scenario steps)
    #[arg(long, default_value = "/")]
    pub path: String,

    /// HTTP method for the request
    #[arg(long, short = 'X', default_value = "GET", value_parser = parse_method)]
    pub method: Method,

    /// Request body
    #[arg(long, short)]
    pub data: Option<String>,

    /// Number of concurrent virtual users
    #[arg(long, short = 'c', alias = "concurrency", default_value = "1")]
    pub users: u64,

    /// Time to ramp up to the full user count (supports ms/s/m/h)
    #[arg(long = "ramp-up", value_parser = parse_duration_arg, conflicts_with = "spawn_rate")]
    pub ramp_up: Option<Duration>,

    /// Users started per second while ramping up
    #[arg(long = "spawn-rate", short = 'r')]
    pub spawn_rate: Option<u64>,

    /// Stop after this long (supports ms/s/m/h); runs until Ctrl+C when unset
    #[arg(long, short = 't', value_parser = parse_duration_arg)]
    pub duration: Option<Duration>,

    /// Minimum think time between requests of one user [default: 1s] (supports ms/s/m/h)
    #[arg(long = "pacing-min", value_parser = parse_duration_arg)]
    pub pacing_min: Option<Duration>,

    /// Maximum think time between requests of one user [default: 2500ms] (supports ms/s/m/h)
    #[arg(long = "pacing-max", value_parser = parse_duration_arg)]
    pub pacing_max: Option<Duration>,

    /// Issue the next request immediately, without think time
    #[arg(long = "no-pacing")]
    pub no_pacing: bool,

    /// Outcome event buffer size; sized from the expected load when unset
    #[arg(long = "channel-capacity")]
    pub channel_capacity: Option<usize>,

    /// Count only this status as success (default: any 2xx)
    #[arg(long, short = 's')]
    pub status: Option<u16>,

    /// Request timeout (supports ms/s/m/h)
    #[arg(long, default_value = "10s", value_parser = parse_duration_arg)]
    pub timeout: Duration,

    /// Timeout for establishing a new connection (supports ms/s/m/h)
    #[arg(long = "connect-timeout", default_value = "5s", value_parser = parse_duration_arg)]
    pub connect_timeout: Duration,

    /// How long users get to finish after a stop before they are aborted
    #[arg(long, default_value = "5s", value_parser = parse_duration_arg)]
    pub grace: Duration,

    /// Log running totals at this interval (supports ms/s/m/h)
    #[arg(long = "progress-interval", value_parser = parse_duration_arg)]
    pub progress_interval: Option<Duration>,

    /// Directory for the JSON summary (test_<unix>_metrics.json)
    #[arg(long = "output-dir", short = 'o')]
    pub output_dir: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by VOLLEY_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(
        long = "no-color",
        env = "NO_COLOR",
        value_parser = parse_bool_env,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true"
    )]
    pub no_color: bool,

    /// Path to config file (TOML/JSON). Defaults to ./volley.toml or ./volley.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Scenario steps loaded from the config file.
    #[arg(skip)]
    pub scenario_steps: Vec<RequestSpec>,
}
