use std::time::Duration;

use crate::domain::clock::Clock;
use crate::domain::notification::Notifier;
use crate::domain::repository::{ArticleRepository, ScheduleRepository};
use crate::domain::scheduler::SchedulerService;

/// Sweep loop configuration.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Seconds between sweep passes.
    pub interval_seconds: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
        }
    }
}

/// Periodic background job promoting due scheduled publications. Runs
/// independently of request handling; each pass is one `run_sweep`.
pub struct SweepWorker<A, S, N, C> {
    config: SweepConfig,
    scheduler: SchedulerService<A, S, N, C>,
    clock: C,
}

impl<A, S, N, C> SweepWorker<A, S, N, C>
where
    A: ArticleRepository,
    S: ScheduleRepository,
    N: Notifier,
    C: Clock,
{
    pub fn new(config: SweepConfig, scheduler: SchedulerService<A, S, N, C>, clock: C) -> Self {
        Self {
            config,
            scheduler,
            clock,
        }
    }

    /// Spawn the loop onto the runtime and return.
    pub fn spawn(self) {
        tracing::info!(
            interval_seconds = self.config.interval_seconds,
            "starting publication sweep worker"
        );

        tokio::spawn(async move {
            let period = Duration::from_secs(self.config.interval_seconds);
            let mut interval = tokio::time::interval(period);
            // The first tick fires immediately; that is fine, a fresh
            // process should drain whatever backlog is already due.
            loop {
                interval.tick().await;

                match self.scheduler.run_sweep(self.clock.now()).await {
                    Ok(0) => tracing::debug!("sweep pass: nothing due"),
                    Ok(promoted) => tracing::info!(promoted, "sweep pass finished"),
                    Err(error) => tracing::error!("sweep pass failed: {:?}", error),
                }
            }
        });
    }
}
