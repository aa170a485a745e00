// Cron Sweep Scheduler
// Runs every registered criteria sweep on a fixed interval

use crate::application::shutdown::ShutdownToken;
use crate::domain::CriteriaType;
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

/// Outcome of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CronReport {
    /// (criterion, user) pairs found satisfied without a completed record
    pub found: usize,
    /// Completion records written
    pub marked: usize,
}

/// A criteria type that can record completions in bulk
#[async_trait]
pub trait CriteriaSweep: Send + Sync {
    fn criteria_type(&self) -> CriteriaType;

    async fn cron(&self) -> Result<CronReport>;
}

/// Cron scheduler
///
/// Runs all sweeps every `interval`, starting immediately
pub struct CronScheduler {
    sweeps: Vec<Arc<dyn CriteriaSweep>>,
    interval: Duration,
}

impl CronScheduler {
    pub fn new(sweeps: Vec<Arc<dyn CriteriaSweep>>, interval: Duration) -> Self {
        Self { sweeps, interval }
    }

    /// Run sweep loop until shutdown (background task)
    ///
    /// Sweep failures are logged and retried on the next tick.
    pub async fn run(self, mut shutdown: ShutdownToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            sweeps = self.sweeps.len(),
            "Cron scheduler started"
        );

        let mut tick = interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if shutdown.is_shutdown() {
                break;
            }

            tokio::select! {
                _ = tick.tick() => {
                    for sweep in &self.sweeps {
                        match sweep.cron().await {
                            Ok(report) => info!(
                                criteria_type = %sweep.criteria_type(),
                                found = report.found,
                                marked = report.marked,
                                "Scheduled sweep completed"
                            ),
                            Err(e) => error!(
                                criteria_type = %sweep.criteria_type(),
                                error = ?e,
                                "Scheduled sweep failed"
                            ),
                        }
                    }
                }
                _ = shutdown.wait() => break,
            }
        }

        info!("Cron scheduler stopped");
    }

    /// Run every sweep once (for manual trigger)
    ///
    /// Stops at the first failing sweep.
    pub async fn run_now(&self) -> Result<Vec<(CriteriaType, CronReport)>> {
        info!("Running manual sweep...");

        let mut reports = Vec::with_capacity(self.sweeps.len());
        for sweep in &self.sweeps {
            let report = sweep.cron().await?;
            reports.push((sweep.criteria_type(), report));
        }

        Ok(reports)
    }
}
