mod support;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use support::spawn_http_server_or_skip;
use volley::engine::{FailurePolicy, Pacing, RunConfig, RunController, RunState};
use volley::http::{HttpClientConfig, Method, ReqwestCapability, RequestSpec};
use volley::scenario::StepScenario;

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn fast_config(users: u64, duration: Duration) -> RunConfig {
    RunConfig {
        target_users: users,
        max_run_duration: Some(duration),
        pacing: Pacing::Constant(Duration::from_millis(20)),
        shutdown_grace: Duration::from_secs(2),
        ..RunConfig::default()
    }
}

#[test]
fn e2e_engine_counts_real_requests() -> Result<(), String> {
    let Some((url, server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    run_async_test(async move {
        let client = ReqwestCapability::new(&HttpClientConfig::new(url.as_str()))
            .map_err(|err| err.to_string())?;
        let mut controller = RunController::new(
            fast_config(4, Duration::from_millis(500)),
            Arc::new(client),
            Arc::new(StepScenario::get("/")),
        )
        .map_err(|err| err.to_string())?;

        let summary = controller.run().await.map_err(|err| err.to_string())?;
        if controller.state() != RunState::Finalized {
            return Err(format!("Unexpected state {}", controller.state()));
        }
        if summary.total_requests == 0 || summary.failure_requests != 0 {
            return Err(format!("Unexpected summary {:?}", summary));
        }
        if summary.total_requests > server.requests() {
            return Err(format!(
                "Recorded {} requests but the server saw {}",
                summary.total_requests,
                server.requests()
            ));
        }
        if summary.total_bytes != summary.success_requests.saturating_mul(2) {
            return Err(format!("Unexpected byte total {}", summary.total_bytes));
        }
        if summary.min_latency_ms > summary.max_latency_ms || summary.throughput_per_sec <= 0.0 {
            return Err(format!("Inconsistent latency or rate: {:?}", summary));
        }
        Ok(())
    })
}

#[test]
fn e2e_engine_mixed_scenario_reports_error_rate() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    run_async_test(async move {
        let client = ReqwestCapability::new(&HttpClientConfig::new(url.as_str()))
            .map_err(|err| err.to_string())?;
        let scenario = StepScenario::new(vec![
            RequestSpec::new("ok", Method::GET, "/ok"),
            RequestSpec::new("fail", Method::GET, "/fail"),
        ])
        .map_err(|err| err.to_string())?;
        let mut controller = RunController::new(
            fast_config(2, Duration::from_millis(500)),
            Arc::new(client),
            Arc::new(scenario),
        )
        .map_err(|err| err.to_string())?;

        let summary = controller.run().await.map_err(|err| err.to_string())?;
        if summary.success_requests == 0 || summary.failure_requests == 0 {
            return Err(format!("Expected both outcomes: {:?}", summary));
        }
        let expected_error_rate =
            summary.failure_requests as f64 / summary.total_requests as f64;
        if (summary.error_rate - expected_error_rate).abs() > 1e-9
            || (summary.availability - (1.0 - expected_error_rate)).abs() > 1e-9
        {
            return Err(format!("Inconsistent rates: {:?}", summary));
        }
        Ok(())
    })
}

#[test]
fn e2e_engine_unreachable_target_fails_every_request() -> Result<(), String> {
    run_async_test(async {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")
            .map_err(|err| format!("bind failed: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("local_addr failed: {}", err))?;
        drop(listener);

        let mut http = HttpClientConfig::new(format!("http://{}", addr));
        http.connect_timeout = Duration::from_millis(200);
        let client = ReqwestCapability::new(&http).map_err(|err| err.to_string())?;
        let config = RunConfig {
            failure_policy: FailurePolicy::expect_status(200),
            ..fast_config(2, Duration::from_millis(300))
        };
        let mut controller = RunController::new(
            config,
            Arc::new(client),
            Arc::new(StepScenario::get("/")),
        )
        .map_err(|err| err.to_string())?;

        let summary = controller.run().await.map_err(|err| err.to_string())?;
        if summary.total_requests > 0
            && summary.success_requests == 0
            && summary.total_bytes == 0
            && summary.availability.abs() < 1e-9
        {
            Ok(())
        } else {
            Err(format!("Unexpected summary {:?}", summary))
        }
    })
}
