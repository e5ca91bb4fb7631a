//! Integration tests for log rotation and archive retention

use brightboost_storage::{LogRotator, RotationPolicy};
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const DAY: Duration = Duration::from_secs(24 * 3600);

/// Test environment with a module directory layout
struct RotationTestEnv {
    #[allow(dead_code)]
    temp_dir: TempDir,
    log_path: PathBuf,
    archive_dir: PathBuf,
}

impl RotationTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log_path = temp_dir.path().join("service.log");
        let archive_dir = temp_dir.path().join("log-arch");

        Self {
            temp_dir,
            log_path,
            archive_dir,
        }
    }

    fn rotator(&self) -> LogRotator {
        LogRotator::new(&self.log_path, &self.archive_dir, RotationPolicy::default())
    }

    fn write_live_log(&self, size: usize) {
        fs::write(&self.log_path, vec![b'.'; size]).unwrap();
    }

    /// Create an archive whose modification time is `age` in the past
    fn create_archive(&self, name: &str, age: Duration) -> PathBuf {
        fs::create_dir_all(&self.archive_dir).unwrap();
        let path = self.archive_dir.join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
        path
    }

    fn archive_count(&self) -> usize {
        fs::read_dir(&self.archive_dir)
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }
}

#[test]
fn test_oversized_log_archived_once() {
    let env = RotationTestEnv::new();
    env.write_live_log(100_001);
    let rotator = env.rotator();

    let report = rotator.rotate();
    let archived = report.archived.expect("log should be archived");
    assert!(archived.starts_with(&env.archive_dir));
    let name = archived.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("log-") && name.ends_with(".log"));
    assert_eq!(fs::metadata(&archived).unwrap().len(), 100_001);

    // The live log is gone until the next append
    assert!(!env.log_path.exists() || fs::metadata(&env.log_path).unwrap().len() < 100_000);
    assert_eq!(env.archive_count(), 1);

    let report = rotator.rotate();
    assert!(report.archived.is_none());
    assert_eq!(env.archive_count(), 1);
}

#[test]
fn test_log_at_limit_not_archived() {
    let env = RotationTestEnv::new();
    env.write_live_log(100_000);

    let report = env.rotator().rotate();
    assert!(report.archived.is_none());
    assert!(env.log_path.exists());
    assert_eq!(env.archive_count(), 0);
}

#[test]
fn test_small_log_never_archived() {
    let env = RotationTestEnv::new();
    env.write_live_log(10);
    let rotator = env.rotator();

    for _ in 0..3 {
        assert!(rotator.rotate().archived.is_none());
    }
    assert_eq!(fs::metadata(&env.log_path).unwrap().len(), 10);
}

#[test]
fn test_count_cap_evicts_one_oldest_per_call() {
    let env = RotationTestEnv::new();
    let mut archives = Vec::new();
    for i in 0..7u64 {
        // archive-0 is the oldest
        let age = Duration::from_secs(3600 * (7 - i));
        archives.push(env.create_archive(&format!("archive-{}.log", i), age));
    }
    let rotator = env.rotator();

    let report = rotator.rotate();
    assert_eq!(report.evicted.as_ref(), Some(&archives[0]));
    assert!(report.expired.is_empty());
    assert_eq!(env.archive_count(), 6);

    let report = rotator.rotate();
    assert_eq!(report.evicted.as_ref(), Some(&archives[1]));
    assert_eq!(env.archive_count(), 5);

    // Converged: never below the cap
    for _ in 0..3 {
        assert!(rotator.rotate().evicted.is_none());
    }
    assert_eq!(env.archive_count(), 5);
    for archive in &archives[2..] {
        assert!(archive.exists());
    }
}

#[test]
fn test_repeated_rotation_is_idempotent() {
    let env = RotationTestEnv::new();
    for i in 0..6u64 {
        let age = Duration::from_secs(60 * (i + 1));
        env.create_archive(&format!("archive-{}.log", i), age);
    }
    let rotator = env.rotator();

    let first = rotator.rotate();
    assert!(first.evicted.is_some());
    assert_eq!(env.archive_count(), 5);

    let second = rotator.rotate();
    assert!(second.is_noop());
    assert_eq!(env.archive_count(), 5);
}

#[test]
fn test_age_expiry_independent_of_count() {
    let env = RotationTestEnv::new();
    let stale = env.create_archive("stale.log", 8 * DAY);
    let fresh = env.create_archive("fresh.log", 6 * DAY);

    let report = env.rotator().rotate();
    assert!(report.evicted.is_none());
    assert_eq!(report.expired, vec![stale.clone()]);
    assert!(!stale.exists());
    assert!(fresh.exists());
}

#[test]
fn test_eviction_and_expiry_in_same_pass() {
    let env = RotationTestEnv::new();
    let oldest = env.create_archive("a.log", 10 * DAY);
    let stale = env.create_archive("b.log", 9 * DAY);
    for i in 0..4u64 {
        env.create_archive(&format!("c{}.log", i), Duration::from_secs(3600 * (i + 1)));
    }
    assert_eq!(env.archive_count(), 6);

    let report = env.rotator().rotate();
    assert_eq!(report.evicted, Some(oldest));
    assert_eq!(report.expired, vec![stale]);
    assert_eq!(env.archive_count(), 4);
}

#[test]
fn test_new_archive_counts_toward_cap() {
    let env = RotationTestEnv::new();
    let mut oldest = None;
    for i in 0..5u64 {
        let age = Duration::from_secs(3600 * (10 - i));
        let path = env.create_archive(&format!("old-{}.log", i), age);
        oldest.get_or_insert(path);
    }
    env.write_live_log(150_000);

    let report = env.rotator().rotate();
    assert!(report.archived.is_some());
    assert_eq!(report.evicted, oldest);
    assert_eq!(env.archive_count(), 5);
}

#[test]
fn test_custom_policy() {
    let env = RotationTestEnv::new();
    let rotator = LogRotator::new(
        &env.log_path,
        &env.archive_dir,
        RotationPolicy {
            max_log_size: 16,
            max_archive_count: 1,
            max_archive_age: DAY,
        },
    );
    env.write_live_log(17);
    env.create_archive("yesterday.log", 2 * DAY);

    let report = rotator.rotate();
    assert!(report.archived.is_some());
    // Two files over a cap of one: the day-old archive is evicted first
    assert!(report.evicted.is_some());
    assert!(report.expired.is_empty());
    assert_eq!(env.archive_count(), 1);
}
