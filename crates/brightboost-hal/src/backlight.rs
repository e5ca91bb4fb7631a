//! Sysfs backlight register
//!
//! Reads and writes the raw panel brightness through
//! `/sys/class/backlight/<device>/brightness`.

use crate::{BrightnessRegister, DeviceError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Well-known brightness file for the panel backlight
pub const DEFAULT_BRIGHTNESS_PATH: &str = "/sys/class/backlight/panel0-backlight/brightness";

const BACKLIGHT_CLASS_DIR: &str = "/sys/class/backlight";

/// Brightness register backed by a sysfs file
#[derive(Debug, Clone)]
pub struct SysfsBacklight {
    path: PathBuf,
}

impl SysfsBacklight {
    /// Use an explicit brightness file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use the well-known panel path, or the first backlight device found
    /// when that path does not exist on this kernel.
    pub fn detect() -> Self {
        let default = PathBuf::from(DEFAULT_BRIGHTNESS_PATH);
        if default.exists() {
            return Self::new(default);
        }

        match Self::scan(Path::new(BACKLIGHT_CLASS_DIR)) {
            Some(backlight) => {
                tracing::info!("Found backlight at {}", backlight.path.display());
                backlight
            }
            None => {
                tracing::warn!(
                    "No backlight device found, falling back to {}",
                    DEFAULT_BRIGHTNESS_PATH
                );
                Self::new(default)
            }
        }
    }

    /// Scan a backlight class directory for the first device with a
    /// `brightness` file
    pub fn scan(class_dir: &Path) -> Option<Self> {
        let mut candidates: Vec<PathBuf> = fs::read_dir(class_dir)
            .ok()?
            .filter_map(|e| e.ok())
            .map(|e| e.path().join("brightness"))
            .filter(|p| p.exists())
            .collect();

        // read_dir order is filesystem dependent
        candidates.sort();
        candidates.into_iter().next().map(Self::new)
    }

    /// Path of the brightness file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hardware maximum from the sibling `max_brightness` file, if exposed
    pub fn max_brightness(&self) -> Option<i32> {
        let max_path = self.path.parent()?.join("max_brightness");
        fs::read_to_string(max_path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl BrightnessRegister for SysfsBacklight {
    fn read(&self) -> Result<i32> {
        if !self.path.exists() {
            return Err(DeviceError::NotFound(self.path.clone()));
        }

        let contents = fs::read_to_string(&self.path)?;
        contents
            .trim()
            .parse()
            .map_err(|_| DeviceError::InvalidValue(contents.trim().to_string()))
    }

    fn write(&self, value: i32) -> Result<()> {
        if !self.path.exists() {
            return Err(DeviceError::NotFound(self.path.clone()));
        }

        fs::write(&self.path, value.to_string()).map_err(|e| {
            DeviceError::WriteFailed(format!("{}: {}", self.path.display(), e))
        })?;

        tracing::trace!("Brightness register set to {}", value);
        Ok(())
    }
}
