mod signals;

use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{debug, info};

use volley::args::LoadArgs;
use volley::config::{DEFAULT_CONFIG_FILES, RunPlan, apply_config, build_plan, load_config};
use volley::engine::RunController;
use volley::error::AppResult;
use volley::http::ReqwestCapability;
use volley::logger::init_logging;
use volley::sinks::{ConsoleSink, JsonFileSink, SummarySink, write_sinks};

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    init_logging(args.verbose, args.no_color);

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }
    let plan = build_plan(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(plan))
}

fn parse_args() -> AppResult<Option<(LoadArgs, ArgMatches)>> {
    let mut cmd = LoadArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = LoadArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(plan: RunPlan) -> AppResult<()> {
    let client = ReqwestCapability::new(&plan.http)?;
    info!("Target: {}", client.base_url());

    let mut controller = RunController::new(plan.run, Arc::new(client), Arc::new(plan.scenario))?;
    let signal_handler = signals::setup_signal_shutdown_handler(&controller.stop_handle());
    let summary = controller.run().await?;
    if let Err(err) = signal_handler.await {
        debug!("Signal handler task ended abnormally: {}", err);
    }

    let mut sinks: Vec<Box<dyn SummarySink>> = vec![Box::new(ConsoleSink)];
    if let Some(dir) = plan.output_dir {
        sinks.push(Box::new(JsonFileSink::new(dir)));
    }
    write_sinks(&sinks, &summary).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_is_shown_only_for_bare_invocations() -> Result<(), String> {
        let bare = [OsString::from("volley")];
        let with_url = [
            OsString::from("volley"),
            OsString::from("--url"),
            OsString::from("http://localhost"),
        ];
        let default_config_present = DEFAULT_CONFIG_FILES
            .iter()
            .any(|path| Path::new(path).exists());

        if should_show_help(&with_url) {
            return Err("Help shown despite arguments".to_owned());
        }
        if should_show_help(&bare) == default_config_present {
            return Err("Bare invocation handled incorrectly".to_owned());
        }
        Ok(())
    }
}
