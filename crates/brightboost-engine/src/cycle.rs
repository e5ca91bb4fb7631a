//! A single boost cycle

use crate::decision::{self, Verdict};
use crate::ramp::{self, RampReport};
use brightboost_config::{
    ConfigSnapshot, ConfigStore, DefaultLevels, EffectiveLevels, ModulePaths,
};
use brightboost_hal::BrightnessRegister;
use brightboost_storage::service_log::tags;
use brightboost_storage::{
    LogRotator, RotationPolicy, RotationReport, StatusDescriptor, StorageError,
};
use chrono::{DateTime, Local, Timelike};

/// What happened in one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The skip switch was present; nothing was read or written
    Skipped,
    Completed(CycleSummary),
}

impl CycleOutcome {
    pub fn boosted(&self) -> bool {
        match self {
            CycleOutcome::Skipped => false,
            CycleOutcome::Completed(summary) => summary.verdict.should_boost(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSummary {
    pub snapshot: ConfigSnapshot,
    pub levels: EffectiveLevels,
    pub step_delta: i32,
    /// Register value read before the decision
    pub brightness: i32,
    pub verdict: Verdict,
    /// Present when a boost ran
    pub ramp: Option<RampReport>,
    pub rotation: RotationReport,
}

/// Owns everything one cycle touches
pub struct BoostCycle<R> {
    paths: ModulePaths,
    defaults: DefaultLevels,
    store: ConfigStore,
    register: R,
    rotator: LogRotator,
    descriptor: StatusDescriptor,
}

impl<R: BrightnessRegister> BoostCycle<R> {
    /// Create a cycle rooted at `paths`, loading the default levels now.
    pub fn new(paths: ModulePaths, register: R) -> Self {
        let defaults = DefaultLevels::load(&paths);
        Self::with_defaults(paths, register, defaults)
    }

    pub fn with_defaults(paths: ModulePaths, register: R, defaults: DefaultLevels) -> Self {
        let store = ConfigStore::new(&paths.config_file);
        let rotator = LogRotator::new(
            &paths.service_log,
            &paths.archive_dir,
            RotationPolicy::default(),
        );
        let descriptor = StatusDescriptor::new(&paths.descriptor);

        Self {
            paths,
            defaults,
            store,
            register,
            rotator,
            descriptor,
        }
    }

    pub fn with_rotation_policy(mut self, policy: RotationPolicy) -> Self {
        self.rotator = LogRotator::new(&self.paths.service_log, &self.paths.archive_dir, policy);
        self
    }

    pub fn paths(&self) -> &ModulePaths {
        &self.paths
    }

    pub fn defaults(&self) -> DefaultLevels {
        self.defaults
    }

    pub fn register(&self) -> &R {
        &self.register
    }

    /// Re-read `CONFIG.prop` and report which levels are in effect.
    pub fn refresh_config(&self) -> ConfigSnapshot {
        let snapshot = self.store.refresh();

        if snapshot.custom_max_brightness != 0 {
            tracing::info!("Using custom max brightness {}", snapshot.custom_max_brightness);
        } else {
            tracing::info!("Using default max brightness {}", self.defaults.max);
        }
        if snapshot.custom_threshold_brightness != 0 {
            tracing::info!(
                "Using custom threshold brightness {}",
                snapshot.custom_threshold_brightness
            );
        } else {
            tracing::info!("Using default threshold brightness {}", self.defaults.threshold);
        }

        snapshot
    }

    pub fn run_once(&self) -> CycleOutcome {
        self.run_once_at(Local::now())
    }

    /// Run one cycle as if the wall clock read `now`.
    pub fn run_once_at(&self, now: DateTime<Local>) -> CycleOutcome {
        if self.paths.skip_requested() {
            tracing::debug!(
                "{} present, skipping cycle",
                self.paths.skip_switch.display()
            );
            return CycleOutcome::Skipped;
        }

        let snapshot = self.refresh_config();
        let levels = snapshot.effective_levels(&self.defaults);
        let brightness = self.register.read_or_zero();

        self.update_status(brightness, &levels, &snapshot);

        let step_delta = levels.step_delta(snapshot.step_count);
        tracing::info!("Step delta set to {}", step_delta);

        let verdict = decision::decide(brightness, &levels, &snapshot.sleep_window, now.hour());

        let ramp = if verdict.should_boost() {
            tracing::info!(tag = tags::START, "Conditions met, raising brightness");
            let report = ramp::apply(
                &self.register,
                snapshot.ramp_mode,
                levels,
                snapshot.step_count,
                step_delta,
            );
            tracing::info!(tag = tags::STOP, "Brightness adjustment finished");
            Some(report)
        } else {
            tracing::info!(tag = tags::SKIP, "Conditions not met, waiting for the next cycle");
            None
        };

        let rotation = self.rotator.rotate_at(now);

        tracing::info!(
            tag = tags::OVER,
            "Cycle finished, next cycle in {} s",
            snapshot.cycle_interval_secs
        );

        CycleOutcome::Completed(CycleSummary {
            snapshot,
            levels,
            step_delta,
            brightness,
            verdict,
            ramp,
            rotation,
        })
    }

    fn update_status(&self, brightness: i32, levels: &EffectiveLevels, snapshot: &ConfigSnapshot) {
        let status = format!(
            "Status OK  brightness {}  boost {} -> {}  refresh every {} s",
            brightness, levels.threshold, levels.max, snapshot.cycle_interval_secs
        );

        match self.descriptor.update(&status) {
            Ok(()) => {}
            Err(StorageError::DescriptorNotFound(path)) => {
                tracing::debug!("No descriptor at {}, status not published", path.display());
            }
            Err(e) => tracing::warn!("Failed to update status: {}", e),
        }
    }
}
