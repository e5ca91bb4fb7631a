//! Boost decision rules

use brightboost_config::{EffectiveLevels, SleepWindow};

/// Outcome of evaluating one brightness reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Register read 0 or less: panel off or unreadable
    InvalidReading,
    /// Already above 90% of the maximum
    NearCeiling,
    /// Below the trigger threshold
    BelowThreshold,
    /// Inside the sleep window
    Sleeping,
    /// Raise brightness to the maximum
    Boost,
}

impl Verdict {
    pub fn should_boost(&self) -> bool {
        matches!(self, Verdict::Boost)
    }
}

/// Apply the rules in order; the first failing rule decides.
pub fn classify(
    current: i32,
    levels: &EffectiveLevels,
    window: &SleepWindow,
    now_hour: u32,
) -> Verdict {
    if current <= 0 {
        return Verdict::InvalidReading;
    }
    if i64::from(current) > levels.ceiling() {
        return Verdict::NearCeiling;
    }
    if i64::from(levels.threshold) - i64::from(current) > 0 {
        return Verdict::BelowThreshold;
    }
    if window.is_disabled() || !window.contains(now_hour) {
        return Verdict::Boost;
    }
    Verdict::Sleeping
}

/// Classify a reading and log the inputs together with the verdict.
pub fn decide(
    current: i32,
    levels: &EffectiveLevels,
    window: &SleepWindow,
    now_hour: u32,
) -> Verdict {
    let verdict = classify(current, levels, window, now_hour);
    if verdict.should_boost() && window.is_disabled() {
        tracing::info!("No sleep window configured, skipping the time check");
    }

    tracing::info!(
        "Current brightness {}, threshold gap {}, hour {}, sleep window {} to {}, boost {} ({:?})",
        current,
        i64::from(levels.threshold) - i64::from(current),
        now_hour,
        window.start,
        window.stop,
        verdict.should_boost(),
        verdict
    );
    verdict
}

/// Whether a boost should run for this reading
pub fn evaluate(
    current: i32,
    levels: &EffectiveLevels,
    window: &SleepWindow,
    now_hour: u32,
) -> bool {
    decide(current, levels, window, now_hour).should_boost()
}
