use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{info, warn};

use crate::error::{RunError, ValidationError};
use crate::http::HttpCapability;
use crate::metrics::{Aggregator, DataQuality, DropCounter, RunSummary, event_channel};
use crate::scenario::ScenarioFactory;
use crate::shutdown::{ShutdownSender, shutdown_channel};

use super::{ExecutorContext, RunConfig, RunState, UserPool};

/// Owns one run: `Idle -> Running -> Stopping -> Finalized`.
///
/// ```no_run
/// # async fn demo(
/// #     client: std::sync::Arc<dyn volley::http::HttpCapability>,
/// # ) -> Result<(), Box<dyn std::error::Error>> {
/// use std::sync::Arc;
/// use std::time::Duration;
/// use volley::engine::{RunConfig, RunController};
/// use volley::scenario::StepScenario;
///
/// let config = RunConfig {
///     target_users: 10,
///     max_run_duration: Some(Duration::from_secs(30)),
///     ..RunConfig::default()
/// };
/// let mut controller = RunController::new(config, client, Arc::new(StepScenario::get("/")))?;
/// let summary = controller.run().await?;
/// println!("{} requests", summary.total_requests);
/// # Ok(())
/// # }
/// ```
pub struct RunController {
    config: RunConfig,
    client: Arc<dyn HttpCapability>,
    factory: Arc<dyn ScenarioFactory>,
    state: RunState,
    shutdown: ShutdownSender,
    active: Option<ActiveRun>,
    summary: Option<Arc<RunSummary>>,
}

struct ActiveRun {
    pool: UserPool,
    aggregator: JoinHandle<Aggregator>,
    dropped: DropCounter,
    deadline: Option<JoinHandle<()>>,
}

impl RunController {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `config` is invalid.
    pub fn new(
        config: RunConfig,
        client: Arc<dyn HttpCapability>,
        factory: Arc<dyn ScenarioFactory>,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        let (shutdown, _initial_rx) = shutdown_channel();
        Ok(Self {
            config,
            client,
            factory,
            state: RunState::Idle,
            shutdown,
            active: None,
            summary: None,
        })
    }

    /// Current state. A running run reports `Stopping` as soon as a stop is
    /// requested or the max run duration elapses.
    #[must_use]
    pub fn state(&self) -> RunState {
        if self.state == RunState::Running && self.shutdown.is_triggered() {
            RunState::Stopping
        } else {
            self.state
        }
    }

    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Requests a stop from anywhere; [`RunController::wait`] returns once it
    /// is triggered.
    #[must_use]
    pub fn stop_handle(&self) -> ShutdownSender {
        self.shutdown.clone()
    }

    /// Users currently running, or zero outside `Running`.
    #[must_use]
    pub fn live_users(&self) -> u64 {
        self.active.as_ref().map_or(0, |active| active.pool.live_users())
    }

    /// Published summary once the run is finalized.
    #[must_use]
    pub fn summary(&self) -> Option<Arc<RunSummary>> {
        self.summary.clone()
    }

    /// Starts the aggregator and the user pool on the current runtime.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::InvalidStateTransition`] unless the run is idle.
    pub fn start(&mut self) -> Result<(), RunError> {
        self.expect_state(RunState::Idle, "start")?;

        let capacity = self.config.effective_channel_capacity();
        let (events_tx, events_rx) = event_channel(capacity);
        let dropped = events_rx.drop_counter();
        let aggregator = Aggregator::new().with_progress_interval(self.config.progress_interval);
        let aggregator = tokio::spawn(aggregator.consume(events_rx));

        let context = ExecutorContext {
            client: Arc::clone(&self.client),
            events: events_tx,
            pacing: self.config.pacing,
            failure_policy: self.config.failure_policy.clone(),
        };
        let pool = UserPool::start(
            self.config.schedule(),
            context,
            Arc::clone(&self.factory),
            &self.shutdown,
            self.config.shutdown_grace,
        );

        let deadline = self
            .config
            .max_run_duration
            .and_then(|limit| Instant::now().checked_add(limit))
            .map(|deadline| spawn_deadline(deadline, self.shutdown.clone()));
        self.active = Some(ActiveRun {
            pool,
            aggregator,
            dropped,
            deadline,
        });
        self.state = RunState::Running;
        info!(
            "Run started: {} users, event channel capacity {}.",
            self.config.target_users, capacity
        );
        Ok(())
    }

    /// Waits until the max run duration elapses or a stop is requested.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::InvalidStateTransition`] unless the run is running.
    pub async fn wait(&self) -> Result<(), RunError> {
        self.expect_state(RunState::Running, "wait")?;
        self.shutdown.subscribe().wait().await;
        Ok(())
    }

    /// Stops every user, drains the event channel and publishes the summary.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::InvalidStateTransition`] unless the run is running,
    /// or a task error if the scheduler or aggregator task died.
    pub async fn stop(&mut self) -> Result<Arc<RunSummary>, RunError> {
        self.expect_state(RunState::Running, "stop")?;
        let Some(active) = self.active.take() else {
            return Err(RunError::InvalidStateTransition {
                state: self.state,
                operation: "stop",
            });
        };
        self.state = RunState::Stopping;
        info!("Stopping run.");
        if let Some(deadline) = active.deadline {
            deadline.abort();
        }

        let report = active.pool.stop().await?;
        let mut aggregator = active
            .aggregator
            .await
            .map_err(|source| RunError::AggregatorTask { source })?;

        let quality = DataQuality {
            dropped_events: active.dropped.get(),
            forced_shutdown: report.forced,
        };
        if quality.dropped_events > 0 {
            warn!(
                "{} outcome events were dropped; counts are a lower bound.",
                quality.dropped_events
            );
        }
        let summary = aggregator.finalize(Instant::now(), quality)?;
        self.summary = Some(Arc::clone(&summary));
        self.state = RunState::Finalized;
        info!(
            "Run finalized: {} users spawned, {} requests.",
            report.spawned, summary.total_requests
        );
        Ok(summary)
    }

    /// `start`, `wait`, then `stop`.
    ///
    /// # Errors
    ///
    /// Propagates the first failing step.
    pub async fn run(&mut self) -> Result<Arc<RunSummary>, RunError> {
        self.start()?;
        self.wait().await?;
        self.stop().await
    }

    fn expect_state(&self, expected: RunState, operation: &'static str) -> Result<(), RunError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(RunError::InvalidStateTransition {
                state: self.state,
                operation,
            })
        }
    }
}

/// Triggers `shutdown` at `deadline` unless a stop was requested earlier.
fn spawn_deadline(deadline: Instant, shutdown: ShutdownSender) -> JoinHandle<()> {
    let mut stopped = shutdown.subscribe();
    tokio::spawn(async move {
        tokio::select! {
            () = stopped.wait() => {}
            () = sleep_until(deadline) => {
                info!("Max run duration reached.");
                shutdown.trigger();
            }
        }
    })
}
