use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::http::HttpCapability;
use crate::metrics::{EventSender, RequestOutcome};
use crate::scenario::Scenario;
use crate::shutdown::ShutdownReceiver;

use super::{FailurePolicy, Pacing};

/// Back-off when a scenario has nothing to send and pacing is disabled.
const IDLE_BACKOFF: Duration = Duration::from_millis(10);

/// What every virtual user of a run shares.
#[derive(Clone)]
pub struct ExecutorContext {
    pub client: Arc<dyn HttpCapability>,
    pub events: EventSender,
    pub pacing: Pacing,
    pub failure_policy: FailurePolicy,
}

/// One virtual user's behaviour loop.
pub struct ScenarioExecutor {
    user_id: u64,
    context: Arc<ExecutorContext>,
    scenario: Box<dyn Scenario>,
}

impl ScenarioExecutor {
    #[must_use]
    pub fn new(user_id: u64, context: Arc<ExecutorContext>, scenario: Box<dyn Scenario>) -> Self {
        Self {
            user_id,
            context,
            scenario,
        }
    }

    /// Issues requests until `shutdown` fires and returns how many outcomes
    /// were emitted.
    ///
    /// Both the HTTP call and the pacing sleep are abandoned as soon as
    /// shutdown is signalled; an abandoned request produces no outcome.
    /// Request failures never end the loop.
    pub async fn run(mut self, mut shutdown: ShutdownReceiver) -> u64 {
        debug!("User {} started.", self.user_id);
        let mut emitted: u64 = 0;

        while !shutdown.is_triggered() {
            let issued = if let Some(request) = self.scenario.next_request() {
                let started = Instant::now();
                let result = tokio::select! {
                    biased;
                    () = shutdown.wait() => break,
                    result = self.context.client.execute(&request) => result,
                };
                let finished = Instant::now();
                let duration = finished.saturating_duration_since(started);

                let outcome = if self.context.failure_policy.is_failure(&result) {
                    RequestOutcome::failure(Arc::clone(&request.label), finished, duration)
                } else {
                    let bytes = result.as_ref().map_or(0, |response| response.body_bytes);
                    RequestOutcome::success(Arc::clone(&request.label), finished, duration, bytes)
                };
                self.scenario.observe(&result);
                let _status = self.context.events.send(outcome);
                emitted = emitted.saturating_add(1);
                true
            } else {
                false
            };

            let mut delay = self.context.pacing.sample();
            if delay.is_zero() && !issued {
                delay = IDLE_BACKOFF;
            }
            if delay.is_zero() {
                tokio::task::yield_now().await;
                continue;
            }
            tokio::select! {
                biased;
                () = shutdown.wait() => break,
                () = sleep(delay) => {}
            }
        }

        debug!("User {} stopped after {} requests.", self.user_id, emitted);
        emitted
    }
}
