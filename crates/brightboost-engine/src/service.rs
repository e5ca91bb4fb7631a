//! Long-running boost loop

use crate::cycle::{BoostCycle, CycleOutcome};
use brightboost_hal::BrightnessRegister;
use std::time::Duration;
use tokio::sync::watch;

/// Counters reported when the loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    /// Cycles that ran to completion
    pub cycles: u64,
    /// Completed cycles that raised the brightness
    pub boosts: u64,
    /// Cycles skipped by the skip switch
    pub skipped: u64,
}

pub struct BoostService<R> {
    cycle: BoostCycle<R>,
}

impl<R: BrightnessRegister> BoostService<R> {
    pub fn new(cycle: BoostCycle<R>) -> Self {
        Self { cycle }
    }

    pub fn cycle(&self) -> &BoostCycle<R> {
        &self.cycle
    }

    /// Wait out the boot delay, then run cycles until `shutdown` turns true.
    ///
    /// Shutdown is only observed while sleeping; a cycle in progress always
    /// finishes.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> ServiceStats {
        let mut stats = ServiceStats::default();

        let startup = self.cycle.refresh_config();
        let mut interval = startup.cycle_interval();
        tracing::info!(
            "Module started, first cycle in {} s",
            startup.boot_delay_secs
        );

        if sleep_or_shutdown(startup.boot_delay(), &mut shutdown).await {
            tracing::info!("Shutdown requested before the first cycle");
            return stats;
        }

        loop {
            match self.cycle.run_once() {
                CycleOutcome::Skipped => stats.skipped += 1,
                CycleOutcome::Completed(summary) => {
                    stats.cycles += 1;
                    if summary.verdict.should_boost() {
                        stats.boosts += 1;
                    }
                    interval = summary.snapshot.cycle_interval();
                }
            }

            if sleep_or_shutdown(interval, &mut shutdown).await {
                break;
            }
        }

        tracing::info!(
            "Service stopped after {} cycles ({} boosts, {} skipped)",
            stats.cycles,
            stats.boosts,
            stats.skipped
        );
        stats
    }
}

/// Sleep for `duration`; returns true if shutdown was requested first.
/// A dropped sender never requests shutdown.
async fn sleep_or_shutdown(duration: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow_and_update() {
        return true;
    }

    let sleep = tokio::time::sleep(duration);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            changed = shutdown.changed() => match changed {
                Ok(()) => {
                    if *shutdown.borrow_and_update() {
                        return true;
                    }
                }
                Err(_) => {
                    sleep.as_mut().await;
                    return false;
                }
            },
        }
    }
}
