//! Startup default levels and the per-cycle effective levels

use crate::ModulePaths;
use std::fs;
use std::path::Path;

/// Threshold and maximum read once at startup. A missing or unreadable file
/// yields 0 for that level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultLevels {
    pub threshold: i32,
    pub max: i32,
}

impl DefaultLevels {
    pub fn load(paths: &ModulePaths) -> Self {
        let levels = Self {
            threshold: read_int_or_zero(&paths.default_threshold_file),
            max: read_int_or_zero(&paths.default_max_file),
        };
        tracing::debug!(
            "Default levels: threshold {} max {}",
            levels.threshold,
            levels.max
        );
        levels
    }
}

/// Levels actually used in one cycle, after custom overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveLevels {
    pub threshold: i32,
    pub max: i32,
}

impl EffectiveLevels {
    /// `(max - threshold) / step_count`, truncated toward zero.
    ///
    /// Zero or negative when `max <= threshold`; callers ramp with it anyway
    /// and finish on `max`.
    pub fn step_delta(&self, step_count: u32) -> i32 {
        let span = i64::from(self.max) - i64::from(self.threshold);
        let delta = span / i64::from(step_count.max(1));
        delta.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    /// Brightness above which no boost is needed (90% of max)
    pub fn ceiling(&self) -> i64 {
        i64::from(self.max) * 9 / 10
    }
}

/// Read a file holding a single integer; 0 when missing or malformed
pub fn read_int_or_zero(path: &Path) -> i32 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.split_whitespace().next()?.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_step_delta() {
        let levels = EffectiveLevels {
            threshold: 50,
            max: 150,
        };
        assert_eq!(levels.step_delta(10), 10);
        assert_eq!(levels.step_delta(3), 33);
    }

    #[test]
    fn test_step_delta_non_positive() {
        let flat = EffectiveLevels {
            threshold: 100,
            max: 100,
        };
        assert_eq!(flat.step_delta(10), 0);

        let inverted = EffectiveLevels {
            threshold: 150,
            max: 50,
        };
        assert_eq!(inverted.step_delta(10), -10);
        // Truncates toward zero like the kernel-side integer math
        assert_eq!(inverted.step_delta(3), -33);
    }

    #[test]
    fn test_ceiling() {
        let levels = EffectiveLevels {
            threshold: 0,
            max: 255,
        };
        assert_eq!(levels.ceiling(), 229);
    }

    #[test]
    fn test_read_int_or_zero() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("FDBRI");

        assert_eq!(read_int_or_zero(&path), 0);

        fs::write(&path, "  1200\n").unwrap();
        assert_eq!(read_int_or_zero(&path), 1200);

        fs::write(&path, "dim").unwrap();
        assert_eq!(read_int_or_zero(&path), 0);
    }

    #[test]
    fn test_load_default_levels() {
        let temp = TempDir::new().unwrap();
        let paths = ModulePaths::new(temp.path());
        fs::create_dir_all(paths.default_threshold_file.parent().unwrap()).unwrap();
        fs::write(&paths.default_threshold_file, "300").unwrap();

        let levels = DefaultLevels::load(&paths);
        assert_eq!(levels.threshold, 300);
        assert_eq!(levels.max, 0);
    }
}
