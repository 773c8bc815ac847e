use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{LoadArgs, parse_method};
use crate::error::{AppError, AppResult, ConfigError};
use crate::http::RequestSpec;

use super::types::{ConfigFile, ScenarioConfig};

/// Fills every argument not given on the command line from `config`.
///
/// # Errors
///
/// Returns an error when config values are invalid or conflict.
pub fn apply_config(
    args: &mut LoadArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if config.ramp_up.is_some() && config.spawn_rate.is_some() {
        return Err(AppError::config(ConfigError::Conflict {
            left: "ramp_up",
            right: "spawn_rate",
        }));
    }

    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "path")
        && let Some(path) = config.path.clone()
    {
        args.path = path;
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method.as_deref()
    {
        args.method = parse_method(method).map_err(AppError::validation)?;
    }

    if !is_cli(matches, "data")
        && let Some(data) = config.data.clone()
    {
        args.data = Some(data);
    }

    if !is_cli(matches, "users")
        && let Some(users) = config.users
    {
        args.users = users;
    }

    let ramp_on_cli = is_cli(matches, "ramp_up") || is_cli(matches, "spawn_rate");
    if !ramp_on_cli {
        if let Some(ramp_up) = config.ramp_up.as_ref() {
            args.ramp_up = Some(ramp_up.to_duration("ramp_up")?);
        }
        if let Some(rate) = config.spawn_rate {
            args.spawn_rate = Some(rate);
        }
    }

    if !is_cli(matches, "duration")
        && let Some(duration) = config.duration.as_ref()
    {
        args.duration = Some(duration.to_duration("duration")?);
    }

    if !is_cli(matches, "pacing_min")
        && let Some(pacing) = config.pacing_min.as_ref()
    {
        args.pacing_min = Some(pacing.to_duration("pacing_min")?);
    }

    if !is_cli(matches, "pacing_max")
        && let Some(pacing) = config.pacing_max.as_ref()
    {
        args.pacing_max = Some(pacing.to_duration("pacing_max")?);
    }

    if !is_cli(matches, "no_pacing")
        && let Some(no_pacing) = config.no_pacing
    {
        args.no_pacing = no_pacing;
    }

    if !is_cli(matches, "channel_capacity")
        && let Some(capacity) = config.channel_capacity
    {
        args.channel_capacity = Some(capacity);
    }

    if !is_cli(matches, "status")
        && let Some(status) = config.status
    {
        args.status = Some(status);
    }

    if !is_cli(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = timeout.to_duration("timeout")?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = timeout.to_duration("connect_timeout")?;
    }

    if !is_cli(matches, "grace")
        && let Some(grace) = config.grace.as_ref()
    {
        args.grace = grace.to_duration("grace")?;
    }

    if !is_cli(matches, "progress_interval")
        && let Some(interval) = config.progress_interval.as_ref()
    {
        args.progress_interval = Some(interval.to_duration("progress_interval")?);
    }

    if !is_cli(matches, "output_dir")
        && let Some(dir) = config.output_dir.clone()
    {
        args.output_dir = Some(dir);
    }

    if let Some(scenario) = config.scenario.as_ref() {
        args.scenario_steps = parse_scenario(scenario)?;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn parse_scenario(config: &ScenarioConfig) -> AppResult<Vec<RequestSpec>> {
    if config.steps.is_empty() {
        return Err(AppError::config(ConfigError::ScenarioMissingSteps));
    }

    let mut steps = Vec::with_capacity(config.steps.len());
    for (index, step) in config.steps.iter().enumerate() {
        let method = match step.method.as_deref() {
            Some(method) => parse_method(method).map_err(|_err| {
                AppError::config(ConfigError::InvalidStepMethod {
                    index,
                    method: method.to_owned(),
                })
            })?,
            None => reqwest::Method::GET,
        };
        let label = step.name.as_deref().unwrap_or(&step.path);
        let mut spec = RequestSpec::new(label, method, step.path.as_str());
        if let Some(body) = step.body.as_deref() {
            spec = spec.with_body(body);
        }
        steps.push(spec);
    }
    Ok(steps)
}
