//! Per-cycle configuration snapshot

use crate::{ConfigError, DefaultLevels, EffectiveLevels};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hour value meaning "no sleep rule configured"
pub const DISABLED_HOUR: i32 = 25;

/// How a boost reaches the maximum brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RampMode {
    /// Jump straight to the maximum
    #[default]
    Direct,
    /// Walk up in `step_count` increments, then settle on the maximum
    Stepped,
}

impl RampMode {
    /// Decode the `bri_update_mode` value (1 or 2)
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(RampMode::Direct),
            2 => Some(RampMode::Stepped),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            RampMode::Direct => 1,
            RampMode::Stepped => 2,
        }
    }
}

/// Inclusive hour range during which boosts are suppressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepWindow {
    pub start: i32,
    pub stop: i32,
}

impl SleepWindow {
    pub const DISABLED: SleepWindow = SleepWindow {
        start: DISABLED_HOUR,
        stop: DISABLED_HOUR,
    };

    pub fn new(start: i32, stop: i32) -> Self {
        Self { start, stop }
    }

    /// Only the 25/25 pair disables the rule
    pub fn is_disabled(&self) -> bool {
        self.start == DISABLED_HOUR && self.stop == DISABLED_HOUR
    }

    /// Whether `hour` falls in `[start, stop]`. A window with
    /// `start > stop` contains no hour.
    pub fn contains(&self, hour: u32) -> bool {
        let hour = hour as i64;
        hour >= self.start as i64 && hour <= self.stop as i64
    }
}

impl Default for SleepWindow {
    fn default() -> Self {
        Self::DISABLED
    }
}

/// Immutable configuration for one cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// Custom maximum brightness (0 = use the startup default)
    #[serde(default)]
    pub custom_max_brightness: i32,

    /// Custom trigger threshold (0 = use the startup default)
    #[serde(default)]
    pub custom_threshold_brightness: i32,

    /// Delay before the first cycle, in seconds
    #[serde(default = "default_boot_delay")]
    pub boot_delay_secs: u64,

    /// Delay between cycles, in seconds
    #[serde(default = "default_cycle_interval")]
    pub cycle_interval_secs: u64,

    #[serde(default)]
    pub ramp_mode: RampMode,

    /// Increments used by a stepped ramp
    #[serde(default = "default_step_count")]
    pub step_count: u32,

    #[serde(default)]
    pub sleep_window: SleepWindow,
}

fn default_boot_delay() -> u64 {
    30
}

fn default_cycle_interval() -> u64 {
    3
}

fn default_step_count() -> u32 {
    10
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            custom_max_brightness: 0,
            custom_threshold_brightness: 0,
            boot_delay_secs: default_boot_delay(),
            cycle_interval_secs: default_cycle_interval(),
            ramp_mode: RampMode::default(),
            step_count: default_step_count(),
            sleep_window: SleepWindow::default(),
        }
    }
}

impl ConfigSnapshot {
    pub fn boot_delay(&self) -> Duration {
        Duration::from_secs(self.boot_delay_secs)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }

    /// Apply the custom overrides to the startup defaults. Each override
    /// only replaces its own level.
    pub fn effective_levels(&self, defaults: &DefaultLevels) -> EffectiveLevels {
        EffectiveLevels {
            threshold: if self.custom_threshold_brightness != 0 {
                self.custom_threshold_brightness
            } else {
                defaults.threshold
            },
            max: if self.custom_max_brightness != 0 {
                self.custom_max_brightness
            } else {
                defaults.max
            },
        }
    }

    /// Render as TOML for `check-config`
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
