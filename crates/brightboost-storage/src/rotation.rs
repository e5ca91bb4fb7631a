//! Log rotation and archive retention
//!
//! Every call recomputes state from the filesystem, so an interrupted
//! rotation is simply finished by the next one.

use crate::StorageError;
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Size, count and age limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Live log size (bytes) above which it is archived
    pub max_log_size: u64,
    /// Archive count above which the oldest archive is evicted
    pub max_archive_count: usize,
    /// Archives older than this are expired
    pub max_archive_age: Duration,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_log_size: 100_000,
            max_archive_count: 5,
            max_archive_age: Duration::from_secs(7 * 24 * 3600),
        }
    }
}

/// What a single rotation pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationReport {
    /// Archive created from the live log
    pub archived: Option<PathBuf>,
    /// Oldest archive removed by the count cap
    pub evicted: Option<PathBuf>,
    /// Archives removed by the age limit
    pub expired: Vec<PathBuf>,
}

impl RotationReport {
    pub fn is_noop(&self) -> bool {
        self.archived.is_none() && self.evicted.is_none() && self.expired.is_empty()
    }
}

/// Archives the live log and trims the archive directory
#[derive(Debug, Clone)]
pub struct LogRotator {
    log_path: PathBuf,
    archive_dir: PathBuf,
    policy: RotationPolicy,
}

struct Archive {
    path: PathBuf,
    modified: SystemTime,
}

impl LogRotator {
    pub fn new(
        log_path: impl Into<PathBuf>,
        archive_dir: impl Into<PathBuf>,
        policy: RotationPolicy,
    ) -> Self {
        Self {
            log_path: log_path.into(),
            archive_dir: archive_dir.into(),
            policy,
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Run one maintenance pass using the current local time
    pub fn rotate(&self) -> RotationReport {
        self.rotate_at(Local::now())
    }

    /// Run one maintenance pass as of `now`.
    ///
    /// Steps run in order: ensure the archive directory, archive an
    /// oversized live log, evict at most one archive over the count cap,
    /// expire archives past the age limit. A failing step is logged and the
    /// remaining steps still run; nothing here is fatal.
    pub fn rotate_at(&self, now: DateTime<Local>) -> RotationReport {
        let mut report = RotationReport::default();

        if let Err(e) = fs::create_dir_all(&self.archive_dir) {
            tracing::warn!(
                "Cannot create archive directory {}: {}",
                self.archive_dir.display(),
                e
            );
            return report;
        }

        match self.archive_live_log(now) {
            Ok(archived) => report.archived = archived,
            Err(e) => tracing::warn!("{}", e),
        }

        match self.evict_oldest() {
            Ok(evicted) => report.evicted = evicted,
            Err(e) => tracing::warn!("{}", e),
        }

        match self.expire(SystemTime::from(now)) {
            Ok(expired) => report.expired = expired,
            Err(e) => tracing::warn!("{}", e),
        }

        report
    }

    /// Archive file name for a rotation at `now`
    pub fn archive_name(now: DateTime<Local>) -> String {
        format!("log-{}.log", now.format("%Y%m%d-%H%M%S"))
    }

    fn archive_live_log(&self, now: DateTime<Local>) -> Result<Option<PathBuf>, StorageError> {
        let size = match fs::metadata(&self.log_path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if size <= self.policy.max_log_size {
            return Ok(None);
        }

        let target = self.archive_dir.join(Self::archive_name(now));
        fs::rename(&self.log_path, &target).map_err(|e| {
            StorageError::ArchiveFailed(format!(
                "{} -> {}: {}",
                self.log_path.display(),
                target.display(),
                e
            ))
        })?;

        // Recreates the live log through the service log writer
        tracing::info!("Log archived as {}", target.display());
        Ok(Some(target))
    }

    /// Remove the single oldest archive when the count exceeds the cap.
    /// At most one file per pass, so a backlog drains over several cycles.
    fn evict_oldest(&self) -> Result<Option<PathBuf>, StorageError> {
        let archives = self.archives()?;
        if archives.len() <= self.policy.max_archive_count {
            return Ok(None);
        }

        let Some(oldest) = archives.into_iter().min_by_key(|a| a.modified) else {
            return Ok(None);
        };

        fs::remove_file(&oldest.path).map_err(|source| StorageError::CleanupFailed {
            path: oldest.path.clone(),
            source,
        })?;

        tracing::info!("Removed oldest archived log {}", oldest.path.display());
        Ok(Some(oldest.path))
    }

    fn expire(&self, now: SystemTime) -> Result<Vec<PathBuf>, StorageError> {
        let mut expired = Vec::new();

        for archive in self.archives()? {
            // Modification times in the future are never expired
            let Ok(age) = now.duration_since(archive.modified) else {
                continue;
            };
            if age <= self.policy.max_archive_age {
                continue;
            }

            match fs::remove_file(&archive.path) {
                Ok(()) => {
                    tracing::debug!("Expired archived log {}", archive.path.display());
                    expired.push(archive.path);
                }
                Err(e) => tracing::warn!(
                    "Failed to expire archived log {}: {}",
                    archive.path.display(),
                    e
                ),
            }
        }

        Ok(expired)
    }

    /// Regular files in the archive directory with their modification time
    fn archives(&self) -> Result<Vec<Archive>, StorageError> {
        let mut archives = Vec::new();

        for entry in fs::read_dir(&self.archive_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            match entry.metadata().and_then(|m| m.modified()) {
                Ok(modified) => archives.push(Archive {
                    path: entry.path(),
                    modified,
                }),
                Err(e) => tracing::debug!("Skipping {}: {}", entry.path().display(), e),
            }
        }

        Ok(archives)
    }
}
