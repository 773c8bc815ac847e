use std::path::PathBuf;
use std::time::Duration;

use crate::args::LoadArgs;
use crate::engine::{FailurePolicy, Pacing, RampSchedule, RunConfig};
use crate::error::{AppError, AppResult, ConfigError};
use crate::http::{HttpClientConfig, RequestSpec};
use crate::scenario::StepScenario;

/// Everything the binary needs to launch a run.
#[derive(Debug)]
pub struct RunPlan {
    pub run: RunConfig,
    pub http: HttpClientConfig,
    pub scenario: StepScenario,
    pub output_dir: Option<PathBuf>,
}

/// Turns merged arguments into engine, client and scenario settings.
///
/// # Errors
///
/// Returns an error when the URL is missing or a setting is invalid.
pub fn build_plan(args: &LoadArgs) -> AppResult<RunPlan> {
    let url = args
        .url
        .clone()
        .ok_or_else(|| AppError::config(ConfigError::MissingUrl))?;

    let ramp_up = match args.spawn_rate {
        Some(rate) => RampSchedule::from_spawn_rate(args.users, rate)
            .map_err(AppError::validation)?
            .ramp_up(),
        None => args.ramp_up.unwrap_or(Duration::ZERO),
    };

    let pacing = if args.no_pacing {
        Pacing::None
    } else {
        Pacing::from_bounds(args.pacing_min, args.pacing_max).map_err(AppError::validation)?
    };

    let failure_policy = args
        .status
        .map_or_else(FailurePolicy::default, FailurePolicy::expect_status);

    let run = RunConfig {
        target_users: args.users,
        ramp_up,
        max_run_duration: args.duration,
        pacing,
        channel_capacity: args.channel_capacity,
        failure_policy,
        shutdown_grace: args.grace,
        progress_interval: args.progress_interval,
    };
    run.validate().map_err(AppError::validation)?;

    let mut http = HttpClientConfig::new(url);
    http.request_timeout = args.timeout;
    http.connect_timeout = args.connect_timeout;

    let steps = if args.scenario_steps.is_empty() {
        let mut step = RequestSpec::new(args.path.as_str(), args.method.clone(), args.path.as_str());
        if let Some(body) = args.data.as_deref() {
            step = step.with_body(body);
        }
        vec![step]
    } else {
        args.scenario_steps.clone()
    };
    let scenario = StepScenario::new(steps).map_err(AppError::validation)?;

    Ok(RunPlan {
        run,
        http,
        scenario,
        output_dir: args.output_dir.as_ref().map(PathBuf::from),
    })
}
