use super::{apply_config, build_plan, load_config_file, parse_duration_value, types::ConfigFile};
use crate::args::LoadArgs;
use crate::engine::Pacing;
use crate::error::{AppError, ConfigError, ValidationError};
use clap::{ArgMatches, CommandFactory, FromArgMatches};
use std::time::Duration;
use tempfile::tempdir;

fn parse_cli(argv: &[&str]) -> Result<(LoadArgs, ArgMatches), String> {
    let matches = LoadArgs::command()
        .try_get_matches_from(argv)
        .map_err(|err| format!("CLI parse failed: {}", err))?;
    let args = LoadArgs::from_arg_matches(&matches).map_err(|err| err.to_string())?;
    Ok((args, matches))
}

fn write_config(name: &str, content: &str) -> Result<(tempfile::TempDir, ConfigFile), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join(name);
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;
    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    Ok((dir, config))
}

#[test]
fn parse_duration_value_units() -> Result<(), String> {
    let cases = [
        ("250ms", Duration::from_millis(250)),
        ("10", Duration::from_secs(10)),
        ("10s", Duration::from_secs(10)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
    ];
    for (input, expected) in cases {
        let parsed = parse_duration_value(input)?;
        if parsed != expected {
            return Err(format!("'{}' parsed as {:?}", input, parsed));
        }
    }
    for bad in ["", "abc", "0", "0ms", "5d", "18446744073709551615h"] {
        if parse_duration_value(bad).is_ok() {
            return Err(format!("'{}' should be rejected", bad));
        }
    }
    Ok(())
}

#[test]
fn parse_toml_config_with_scenario() -> Result<(), String> {
    let (_dir, config) = write_config(
        "volley.toml",
        r#"
url = "http://localhost:3000"
users = 50
ramp_up = "10s"
duration = 60
pacing_min = "500ms"
pacing_max = "1s"

[[scenario.steps]]
name = "home"
path = "/"

[[scenario.steps]]
name = "login"
method = "post"
path = "/login"
body = '{"user":"demo"}'
"#,
    )?;

    if config.url.as_deref() != Some("http://localhost:3000") || config.users != Some(50) {
        return Err(format!("Unexpected config: {:?}", config));
    }
    let steps = config
        .scenario
        .as_ref()
        .map(|scenario| scenario.steps.len())
        .unwrap_or_default();
    if steps == 2 {
        Ok(())
    } else {
        Err(format!("Expected 2 steps, got {}", steps))
    }
}

#[test]
fn parse_json_config() -> Result<(), String> {
    let (_dir, config) = write_config(
        "volley.json",
        r#"{ "url": "http://localhost:3000", "spawn_rate": 5, "status": 204, "grace": "2s" }"#,
    )?;
    if config.spawn_rate == Some(5) && config.status == Some(204) && config.grace.is_some() {
        Ok(())
    } else {
        Err(format!("Unexpected config: {:?}", config))
    }
}

#[test]
fn unsupported_extension_is_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("volley.yaml");
    std::fs::write(&path, "url: x").map_err(|err| format!("write failed: {}", err))?;
    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) if ext == "yaml" => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("yaml config accepted".to_owned()),
    }
}

#[test]
fn cli_values_override_config_values() -> Result<(), String> {
    let (args_in, matches) = parse_cli(&["volley", "--users", "7", "--timeout", "3s"])?;
    let mut args = args_in;
    let config = ConfigFile {
        url: Some("http://config.example".to_owned()),
        users: Some(100),
        timeout: Some(super::types::DurationValue::Text("20s".to_owned())),
        grace: Some(super::types::DurationValue::Seconds(9)),
        ..ConfigFile::default()
    };
    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.users != 7 || args.timeout != Duration::from_secs(3) {
        return Err(format!("CLI values lost: {:?}", args));
    }
    if args.url.as_deref() != Some("http://config.example") || args.grace != Duration::from_secs(9)
    {
        return Err(format!("Config values not applied: {:?}", args));
    }
    Ok(())
}

#[test]
fn cli_spawn_rate_beats_config_ramp_up() -> Result<(), String> {
    let (args_in, matches) = parse_cli(&["volley", "-u", "http://x", "-c", "20", "-r", "4"])?;
    let mut args = args_in;
    let config = ConfigFile {
        ramp_up: Some(super::types::DurationValue::Text("1m".to_owned())),
        ..ConfigFile::default()
    };
    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;
    let plan = build_plan(&args).map_err(|err| err.to_string())?;
    if args.ramp_up.is_none() && plan.run.ramp_up == Duration::from_secs(5) {
        Ok(())
    } else {
        Err(format!("Unexpected ramp-up {:?}", plan.run.ramp_up))
    }
}

#[test]
fn config_cannot_set_ramp_up_and_spawn_rate() -> Result<(), String> {
    let (args_in, matches) = parse_cli(&["volley"])?;
    let mut args = args_in;
    let config = ConfigFile {
        ramp_up: Some(super::types::DurationValue::Seconds(10)),
        spawn_rate: Some(2),
        ..ConfigFile::default()
    };
    match apply_config(&mut args, &matches, &config) {
        Err(AppError::Config(ConfigError::Conflict { .. })) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(()) => Err("Conflicting ramp settings accepted".to_owned()),
    }
}

#[test]
fn scenario_steps_reach_the_plan() -> Result<(), String> {
    let (_dir, config) = write_config(
        "volley.toml",
        r#"
url = "http://localhost:3000"

[[scenario.steps]]
path = "/items"

[[scenario.steps]]
name = "create"
method = "PUT"
path = "/items/1"
body = "{}"
"#,
    )?;
    let (args_in, matches) = parse_cli(&["volley"])?;
    let mut args = args_in;
    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;
    let plan = build_plan(&args).map_err(|err| err.to_string())?;

    let steps = plan.scenario.steps();
    let labels: Vec<&str> = steps.iter().map(|step| &*step.label).collect();
    let has_body = steps
        .get(1)
        .is_some_and(|step| step.method == reqwest::Method::PUT && step.body.is_some());
    if labels == ["/items", "create"] && has_body {
        Ok(())
    } else {
        Err(format!("Unexpected steps: {:?}", steps))
    }
}

#[test]
fn invalid_step_method_is_reported_with_index() -> Result<(), String> {
    let (_dir, config) = write_config(
        "volley.json",
        r#"{ "scenario": { "steps": [ { "path": "/" }, { "path": "/x", "method": "FETCH" } ] } }"#,
    )?;
    let (args_in, matches) = parse_cli(&["volley"])?;
    let mut args = args_in;
    match apply_config(&mut args, &matches, &config) {
        Err(AppError::Config(ConfigError::InvalidStepMethod { index: 1, .. })) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(()) => Err("Invalid method accepted".to_owned()),
    }
}

#[test]
fn plan_defaults_match_single_get_user() -> Result<(), String> {
    let (args, _matches) = parse_cli(&["volley", "-u", "http://localhost:8080"])?;
    let plan = build_plan(&args).map_err(|err| err.to_string())?;

    let single_get = plan
        .scenario
        .steps()
        .iter()
        .map(|step| (step.method.clone(), step.path.clone()))
        .eq([(reqwest::Method::GET, "/".to_owned())]);
    let expected_pacing = Pacing::Uniform {
        min: Duration::from_secs(1),
        max: Duration::from_millis(2500),
    };
    if single_get
        && plan.run.pacing == expected_pacing
        && plan.run.target_users == 1
        && plan.run.max_run_duration.is_none()
        && plan.output_dir.is_none()
    {
        Ok(())
    } else {
        Err(format!("Unexpected plan: {:?}", plan))
    }
}

#[test]
fn plan_requires_url() -> Result<(), String> {
    let (args, _matches) = parse_cli(&["volley"])?;
    match build_plan(&args) {
        Err(AppError::Config(ConfigError::MissingUrl)) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Plan built without a URL".to_owned()),
    }
}

#[test]
fn single_pacing_bound_moves_the_default_one() -> Result<(), String> {
    let cases: [(&[&str], Pacing); 4] = [
        (
            &["--pacing-min", "3s"],
            Pacing::Constant(Duration::from_secs(3)),
        ),
        (
            &["--pacing-min", "2s"],
            Pacing::Uniform {
                min: Duration::from_secs(2),
                max: Duration::from_millis(2500),
            },
        ),
        (
            &["--pacing-max", "500ms"],
            Pacing::Constant(Duration::from_millis(500)),
        ),
        (
            &["--pacing-max", "5s"],
            Pacing::Uniform {
                min: Duration::from_secs(1),
                max: Duration::from_secs(5),
            },
        ),
    ];
    for (flags, expected) in cases {
        let mut argv = vec!["volley", "-u", "http://localhost"];
        argv.extend_from_slice(flags);
        let (args, _matches) = parse_cli(&argv)?;
        let plan = build_plan(&args).map_err(|err| format!("{:?}: {}", flags, err))?;
        if plan.run.pacing != expected {
            return Err(format!("{:?} gave {:?}", flags, plan.run.pacing));
        }
    }

    let (args, _matches) = parse_cli(&[
        "volley",
        "-u",
        "http://localhost",
        "--pacing-min",
        "3s",
        "--pacing-max",
        "1s",
    ])?;
    match build_plan(&args) {
        Err(AppError::Validation(ValidationError::PacingRangeInverted { .. })) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(plan) => Err(format!("Inverted range accepted: {:?}", plan.run.pacing)),
    }
}
