use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, sleep_until, timeout};
use tracing::{debug, info, warn};

use crate::error::RunError;
use crate::scenario::ScenarioFactory;
use crate::shutdown::ShutdownSender;

use super::{ExecutorContext, RampSchedule, ScenarioExecutor};

/// How the population of virtual users ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolReport {
    pub spawned: u64,
    /// Some users outlived the grace timeout and were aborted.
    pub forced: bool,
}

/// Spawns virtual users along a [`RampSchedule`] and tears them down on
/// shutdown.
///
/// A single spawner task owns every user handle, so nothing outlives
/// [`UserPool::stop`]: users that ignore the shutdown signal past the grace
/// timeout are aborted.
#[derive(Debug)]
pub struct UserPool {
    shutdown: ShutdownSender,
    spawner: Option<JoinHandle<PoolReport>>,
    live_users: Arc<AtomicU64>,
}

struct PoolPlan {
    schedule: RampSchedule,
    context: Arc<ExecutorContext>,
    factory: Arc<dyn ScenarioFactory>,
    shutdown: ShutdownSender,
    grace: Duration,
    live_users: Arc<AtomicU64>,
}

/// Keeps the live-user gauge accurate even when a user task is aborted.
struct LiveUser(Arc<AtomicU64>);

impl LiveUser {
    fn enter(counter: &Arc<AtomicU64>) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self(Arc::clone(counter))
    }
}

impl Drop for LiveUser {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

impl UserPool {
    /// Starts the spawner on the current runtime. Users keep running until
    /// `shutdown` is triggered.
    #[must_use]
    pub fn start(
        schedule: RampSchedule,
        context: ExecutorContext,
        factory: Arc<dyn ScenarioFactory>,
        shutdown: &ShutdownSender,
        grace: Duration,
    ) -> Self {
        let live_users = Arc::new(AtomicU64::new(0));
        let plan = PoolPlan {
            schedule,
            context: Arc::new(context),
            factory,
            shutdown: shutdown.clone(),
            grace,
            live_users: Arc::clone(&live_users),
        };
        let spawner = tokio::spawn(run_spawner(plan));
        Self {
            shutdown: shutdown.clone(),
            spawner: Some(spawner),
            live_users,
        }
    }

    /// Users currently inside their behaviour loop.
    #[must_use]
    pub fn live_users(&self) -> u64 {
        self.live_users.load(Ordering::Relaxed)
    }

    /// Signals shutdown and waits for every user to exit.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::SchedulerTask`] if the spawner task panicked.
    pub async fn stop(mut self) -> Result<PoolReport, RunError> {
        self.shutdown.trigger();
        match self.spawner.take() {
            Some(spawner) => spawner
                .await
                .map_err(|source| RunError::SchedulerTask { source }),
            None => Ok(PoolReport::default()),
        }
    }
}

impl Drop for UserPool {
    fn drop(&mut self) {
        if self.spawner.is_some() {
            self.shutdown.trigger();
        }
    }
}

async fn run_spawner(plan: PoolPlan) -> PoolReport {
    let mut shutdown = plan.shutdown.subscribe();
    let mut users: JoinSet<u64> = JoinSet::new();
    let ramp_started = Instant::now();
    let target = plan.schedule.target_users();
    let mut spawned: u64 = 0;

    if target > 0 {
        info!(
            "Spawning {} users over {:?} ({:.2} users/s).",
            target,
            plan.schedule.ramp_up(),
            plan.schedule.spawn_rate()
        );
    }

    for user_id in 0..target {
        let due = ramp_started
            .checked_add(plan.schedule.offset_for(user_id))
            .unwrap_or(ramp_started);
        tokio::select! {
            biased;
            () = shutdown.wait() => break,
            () = sleep_until(due) => {}
        }

        let executor = ScenarioExecutor::new(
            user_id,
            Arc::clone(&plan.context),
            plan.factory.build(user_id),
        );
        let user_shutdown = plan.shutdown.subscribe();
        let live = LiveUser::enter(&plan.live_users);
        users.spawn(async move {
            let _live = live;
            executor.run(user_shutdown).await
        });
        spawned = spawned.saturating_add(1);
    }

    if spawned == target && target > 0 {
        info!("All {} users running.", spawned);
    }
    drop(plan.context);
    shutdown.wait().await;

    let forced = drain_users(&mut users, plan.grace).await;
    PoolReport { spawned, forced }
}

/// Waits up to `grace` for users to finish; aborts the rest. Returns whether
/// anything had to be aborted.
async fn drain_users(users: &mut JoinSet<u64>, grace: Duration) -> bool {
    let drained = timeout(grace, async {
        while let Some(joined) = users.join_next().await {
            match joined {
                Ok(emitted) => debug!("User exited after {} requests.", emitted),
                Err(err) => warn!("User task failed: {}", err),
            }
        }
    })
    .await;

    if drained.is_ok() {
        return false;
    }
    warn!(
        "{} users still running after {:?} grace; aborting them.",
        users.len(),
        grace
    );
    users.shutdown().await;
    true
}
