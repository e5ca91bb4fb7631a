//! `CONFIG.prop` reader

use crate::{ConfigError, ConfigSnapshot, RampMode};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads `CONFIG.prop` into a fresh snapshot on demand
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration, falling back to defaults when the file cannot
    /// be read. Never fails.
    pub fn refresh(&self) -> ConfigSnapshot {
        match self.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    "Cannot read {} ({}), using default configuration",
                    self.path.display(),
                    e
                );
                ConfigSnapshot::default()
            }
        }
    }

    /// Load the configuration, reporting an unreadable file
    pub fn load(&self) -> Result<ConfigSnapshot, ConfigError> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(Self::parse(&contents))
    }

    /// Build a snapshot from file contents. Bad lines and values are skipped
    /// and leave the corresponding default in place.
    pub fn parse(contents: &str) -> ConfigSnapshot {
        let mut snapshot = ConfigSnapshot::default();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };

            match apply(&mut snapshot, key.trim(), value.trim()) {
                Ok(()) => {}
                Err(e) if key.trim() == "bri_update_mode" => {
                    tracing::warn!("{}, falling back to direct mode", e);
                }
                Err(e) => tracing::debug!("Ignoring config line {:?}: {}", line, e),
            }
        }

        snapshot
    }
}

fn apply(snapshot: &mut ConfigSnapshot, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "custom_max_bri" => snapshot.custom_max_brightness = parse_int(key, value)?,
        "custom_thr_bri" => snapshot.custom_threshold_brightness = parse_int(key, value)?,
        "boost_wait_time" => snapshot.boot_delay_secs = parse_positive(key, value)?,
        "flash_wait_time" => snapshot.cycle_interval_secs = parse_positive(key, value)?,
        "bri_update_mode" => {
            // An invalid mode resets to direct even if an earlier line set it
            snapshot.ramp_mode = RampMode::Direct;
            let code: i64 = parse_int(key, value)?;
            snapshot.ramp_mode = RampMode::from_code(code).ok_or_else(|| invalid(key, value))?;
        }
        "sleep_start" => snapshot.sleep_window.start = parse_int(key, value)?,
        "sleep_stop" => snapshot.sleep_window.stop = parse_int(key, value)?,
        "step_num" => snapshot.step_count = parse_positive(key, value)?,
        _ => {}
    }
    Ok(())
}

/// Parse the integer at the start of `value`, ignoring trailing text such as
/// a unit or an inline comment (`5s`, `5 # five`).
fn parse_int<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    leading_int(value)
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("{} is not an integer: {:?}", key, value)))
}

fn leading_int(value: &str) -> &str {
    let token = value.split_whitespace().next().unwrap_or("");
    let end = token
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(token.len(), |(i, _)| i);
    &token[..end]
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialOrd,
{
    let parsed: T = parse_int(key, value)?;
    if parsed > T::default() {
        Ok(parsed)
    } else {
        Err(invalid(key, value))
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SleepWindow;

    #[test]
    fn test_parse_all_keys() {
        let snapshot = ConfigStore::parse(
            r#"
# brightness
custom_max_bri=2047
custom_thr_bri=900
boost_wait_time=60
flash_wait_time=5
bri_update_mode=2
sleep_start=1
sleep_stop=6
step_num=20
"#,
        );

        assert_eq!(snapshot.custom_max_brightness, 2047);
        assert_eq!(snapshot.custom_threshold_brightness, 900);
        assert_eq!(snapshot.boot_delay_secs, 60);
        assert_eq!(snapshot.cycle_interval_secs, 5);
        assert_eq!(snapshot.ramp_mode, RampMode::Stepped);
        assert_eq!(snapshot.sleep_window, SleepWindow::new(1, 6));
        assert_eq!(snapshot.step_count, 20);
    }

    #[test]
    fn test_empty_contents_yield_defaults() {
        assert_eq!(ConfigStore::parse(""), ConfigSnapshot::default());
        assert_eq!(
            ConfigStore::parse("# only a comment\n\n"),
            ConfigSnapshot::default()
        );
    }

    #[test]
    fn test_non_positive_values_keep_defaults() {
        let snapshot = ConfigStore::parse(
            "boost_wait_time=0\nflash_wait_time=-3\nstep_num=0\n",
        );
        assert_eq!(snapshot.boot_delay_secs, 30);
        assert_eq!(snapshot.cycle_interval_secs, 3);
        assert_eq!(snapshot.step_count, 10);
    }

    #[test]
    fn test_invalid_mode_keeps_direct() {
        let snapshot = ConfigStore::parse("bri_update_mode=3\n");
        assert_eq!(snapshot.ramp_mode, RampMode::Direct);

        let snapshot = ConfigStore::parse("bri_update_mode=fast\n");
        assert_eq!(snapshot.ramp_mode, RampMode::Direct);

        let snapshot = ConfigStore::parse("bri_update_mode=2\nbri_update_mode=9\n");
        assert_eq!(snapshot.ramp_mode, RampMode::Direct);
    }

    #[test]
    fn test_garbage_lines_ignored() {
        let snapshot = ConfigStore::parse(
            "this line has no equals sign\nunknown_key=5\ncustom_max_bri=lots\n=7\nstep_num=4\n",
        );
        assert_eq!(snapshot.custom_max_brightness, 0);
        assert_eq!(snapshot.step_count, 4);
    }

    #[test]
    fn test_whitespace_around_keys_and_values() {
        let snapshot = ConfigStore::parse("  custom_thr_bri = 120  \r\nsleep_start= 22\n");
        assert_eq!(snapshot.custom_threshold_brightness, 120);
        assert_eq!(snapshot.sleep_window.start, 22);
        assert_eq!(snapshot.sleep_window.stop, 25);
    }

    #[test]
    fn test_zero_custom_values_mean_unset() {
        let snapshot = ConfigStore::parse("custom_max_bri=0\ncustom_thr_bri=0\n");
        assert_eq!(snapshot, ConfigSnapshot::default());
    }

    #[test]
    fn test_later_lines_win() {
        let snapshot = ConfigStore::parse("step_num=4\nstep_num=8\n");
        assert_eq!(snapshot.step_count, 8);
    }

    #[test]
    fn test_refresh_missing_file() {
        let store = ConfigStore::new("/nonexistent/CONFIG.prop");
        assert!(store.load().is_err());
        assert_eq!(store.refresh(), ConfigSnapshot::default());
    }

    #[test]
    fn test_trailing_text_after_number() {
        let snapshot = ConfigStore::parse(
            "step_num=5 # five steps\nflash_wait_time=5s\ncustom_max_bri=+300\nsleep_start=-2h\n",
        );
        assert_eq!(snapshot.step_count, 5);
        assert_eq!(snapshot.cycle_interval_secs, 5);
        assert_eq!(snapshot.custom_max_brightness, 300);
        assert_eq!(snapshot.sleep_window.start, -2);
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("42"), "42");
        assert_eq!(leading_int("  42abc"), "42");
        assert_eq!(leading_int("-7 # note"), "-7");
        assert_eq!(leading_int("abc"), "");
        assert_eq!(leading_int(""), "");
        // A lone sign is not a number
        assert!(parse_int::<i32>("k", "-").is_err());
        assert!(parse_int::<i32>("k", "x5").is_err());
    }
}
