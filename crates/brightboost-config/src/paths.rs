//! Resolved file locations
//!
//! Everything lives under the module directory except the backlight register,
//! so tests can point the whole daemon at a temporary directory.

use std::path::{Path, PathBuf};

/// Operator configuration file
pub const CONFIG_FILE: &str = "CONFIG.prop";
/// Directory holding the startup default levels
pub const DEFAULTS_DIR: &str = "yule";
/// Live service log
pub const SERVICE_LOG: &str = "service.log";
/// Archive directory for rotated logs
pub const ARCHIVE_DIR: &str = "log-arch";
/// Presence of this file skips cycles
pub const SKIP_SWITCH: &str = "DONT-RUN";
/// Module descriptor whose last line carries the status
pub const DESCRIPTOR: &str = "module.prop";

/// Standard brightboost paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePaths {
    pub module_dir: PathBuf,
    pub config_file: PathBuf,
    pub default_threshold_file: PathBuf,
    pub default_max_file: PathBuf,
    pub service_log: PathBuf,
    pub archive_dir: PathBuf,
    pub skip_switch: PathBuf,
    pub descriptor: PathBuf,
    /// Backlight brightness register; `None` means auto-detect
    pub brightness: Option<PathBuf>,
}

impl ModulePaths {
    pub fn new(module_dir: impl AsRef<Path>) -> Self {
        let dir = module_dir.as_ref();
        Self {
            module_dir: dir.to_path_buf(),
            config_file: dir.join(CONFIG_FILE),
            default_threshold_file: dir.join(DEFAULTS_DIR).join("FDBRI"),
            default_max_file: dir.join(DEFAULTS_DIR).join("MAXBRI"),
            service_log: dir.join(SERVICE_LOG),
            archive_dir: dir.join(ARCHIVE_DIR),
            skip_switch: dir.join(SKIP_SWITCH),
            descriptor: dir.join(DESCRIPTOR),
            brightness: None,
        }
    }

    pub fn with_brightness(mut self, path: impl Into<PathBuf>) -> Self {
        self.brightness = Some(path.into());
        self
    }

    /// Checked every cycle, never cached
    pub fn skip_requested(&self) -> bool {
        self.skip_switch.exists()
    }
}
