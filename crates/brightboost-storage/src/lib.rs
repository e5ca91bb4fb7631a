//! On-disk bookkeeping for brightboost
//!
//! The daemon runs on devices with little free space, so its log is bounded:
//! the live `service.log` is archived once it grows past a size limit and the
//! archive directory is trimmed by count and by age on every cycle.
//!
//! # Layout
//!
//! - `service.log` - live log, appended one event at a time
//! - `log-arch/log-YYYYMMDD-HHMMSS.log` - rotated logs
//! - `module.prop` - module descriptor, last line carries the live status

mod descriptor;
mod rotation;
pub mod service_log;

pub use descriptor::StatusDescriptor;
pub use rotation::{LogRotator, RotationPolicy, RotationReport};
pub use service_log::{ServiceLogFormat, ServiceLogWriter, service_log_layer};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Archive failed: {0}")]
    ArchiveFailed(String),

    #[error("Cleanup failed for {path}: {source}")]
    CleanupFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Descriptor not found: {0}")]
    DescriptorNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
