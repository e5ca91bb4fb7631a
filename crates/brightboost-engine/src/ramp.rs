//! Brightness ramp execution

use brightboost_config::{EffectiveLevels, RampMode};
use brightboost_hal::BrightnessRegister;
use brightboost_storage::service_log::tags;

/// Register writes issued by one ramp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RampReport {
    /// Writes attempted, including the final write of the maximum
    pub writes: usize,
    /// Writes the register rejected
    pub failed: usize,
}

/// Raise the register to `levels.max`.
///
/// Stepped mode writes `threshold + k * step_delta` for `k = 1..=step_count`
/// first. Both modes finish with a write of exactly `levels.max`, so rounding
/// in `step_delta` never leaves the panel short of the target. Writes are
/// independent and never retried.
pub fn apply<R: BrightnessRegister + ?Sized>(
    register: &R,
    mode: RampMode,
    levels: EffectiveLevels,
    step_count: u32,
    step_delta: i32,
) -> RampReport {
    let mut report = RampReport::default();

    match mode {
        RampMode::Direct => {
            tracing::info!(
                tag = tags::GO,
                "Ramp mode {}, raising brightness from {} to {}",
                mode.code(),
                levels.threshold,
                levels.max
            );
        }
        RampMode::Stepped => {
            tracing::info!(
                tag = tags::GO,
                "Ramp mode {}, raising brightness from {} to {} in {} steps",
                mode.code(),
                levels.threshold,
                levels.max,
                step_count
            );
            for k in 1..=step_count {
                write(register, step_value(levels.threshold, step_delta, k), &mut report);
            }
        }
    }

    write(register, levels.max, &mut report);
    report
}

fn step_value(threshold: i32, step_delta: i32, k: u32) -> i32 {
    let value = i64::from(threshold) + i64::from(step_delta) * i64::from(k);
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn write<R: BrightnessRegister + ?Sized>(register: &R, value: i32, report: &mut RampReport) {
    report.writes += 1;
    if let Err(e) = register.write(value) {
        report.failed += 1;
        tracing::debug!("Ignoring failed brightness write of {}: {}", value, e);
    }
}
