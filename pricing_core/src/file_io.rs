//! # Workbook Storage
//!
//! Workbooks live in `.cennik` JSON files, usually on a shared office drive.
//!
//! - **Atomic saves**: write `.cennik.tmp`, fsync, rename over the target
//! - **Advisory locks**: a `.cennik.lock` file names who is editing, backed
//!   by an OS lock from fs2
//! - **Version check**: files from a newer schema are refused
//!
//! Callers that only need "load a snapshot, save a snapshot" go through the
//! [`SnapshotStore`] trait; [`JsonFileStore`] is the file implementation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pricing_core::file_io::{JsonFileStore, SnapshotStore};
//! use pricing_core::workbook::Workbook;
//!
//! let store = JsonFileStore::new("cennik.cennik", "anna@hurtownia.pl");
//! let mut workbook = store.load_or_builtin()?;
//! workbook.chimney.catalog.set_price("PK_40", 43.0)?;
//! store.save(&workbook)?;
//! # Ok::<(), pricing_core::errors::CalcError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{CalcError, CalcResult};
use crate::workbook::{Workbook, SCHEMA_VERSION};

/// File extension of workbook files
pub const WORKBOOK_EXTENSION: &str = "cennik";

/// Who holds a workbook lock; stored as JSON in the `.cennik.lock` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or login)
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

/// Exclusive edit lock on a workbook file, released on drop.
#[derive(Debug)]
pub struct FileLock {
    workbook_path: PathBuf,
    lock_path: PathBuf,
    // Holds the OS-level lock
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Take the edit lock on `path`.
    ///
    /// Fails with [`CalcError::FileLocked`] while another live process holds
    /// it. A lock left behind by a dead process, or older than a day, is
    /// taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Ok(existing) = read_lock_info(&lock_path) {
            if !is_lock_stale(&existing) {
                return Err(CalcError::file_locked(
                    path.display().to_string(),
                    format!("{} ({})", existing.user_id, existing.machine),
                    existing.locked_at.to_rfc3339(),
                ));
            }
            warn!(
                path = %path.display(),
                previous_owner = %existing.user_id,
                "taking over stale workbook lock"
            );
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        // The holder's info stays intact until the OS lock is ours
        lock_file
            .try_lock_exclusive()
            .map_err(|_| CalcError::file_locked(path.display().to_string(), "another process", "unknown"))?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(CalcError::serialization)?;
        lock_file
            .set_len(0)
            .and_then(|_| lock_file.write_all(lock_json.as_bytes()))
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        debug!(path = %path.display(), user = %info.user_id, "workbook lock acquired");
        Ok(FileLock {
            workbook_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Who holds the lock on `path`, if anyone live does.
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path))
            .ok()
            .filter(|info| !is_lock_stale(info))
    }

    pub fn workbook_path(&self) -> &Path {
        &self.workbook_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `book.cennik` -> `book.cennik.lock`
fn lock_path_for(workbook_path: &Path) -> PathBuf {
    with_suffix(workbook_path, "lock")
}

/// `book.cennik` -> `book.cennik.tmp`
fn temp_path_for(workbook_path: &Path) -> PathBuf {
    with_suffix(workbook_path, "tmp")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut out = path.to_path_buf();
    let extension = path
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    out.set_extension(extension);
    out
}

fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let contents = fs::read_to_string(lock_path)
        .map_err(|e| CalcError::file_error("read lock", lock_path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&contents).map_err(CalcError::serialization)
}

/// A lock is stale when its process is gone (same machine only) or it is
/// more than 24 hours old.
fn is_lock_stale(info: &LockInfo) -> bool {
    if hostname().as_deref() == Some(info.machine.as_str()) {
        #[cfg(unix)]
        {
            if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                return true;
            }
        }
        #[cfg(windows)]
        {
            use std::process::Command;
            let output = Command::new("tasklist")
                .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                .output();
            if let Ok(output) = output {
                let stdout = String::from_utf8_lossy(&output.stdout);
                if !stdout.contains(&info.pid.to_string()) {
                    return true;
                }
            }
        }
    }

    (Utc::now() - info.locked_at).num_hours() > 24
}

/// Save a workbook atomically (temp file, fsync, rename).
pub fn save_workbook(workbook: &Workbook, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(workbook).map_err(CalcError::serialization)?;
    let tmp_path = temp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .write_all(json.as_bytes())
        .and_then(|_| tmp_file.sync_all())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(path = %path.display(), quotes = workbook.quote_count(), "workbook saved");
    Ok(())
}

/// Load a workbook and check its schema version.
///
/// # Errors
///
/// - [`CalcError::FileError`] on I/O failure
/// - [`CalcError::SerializationError`] for invalid JSON
/// - [`CalcError::VersionMismatch`] for an incompatible schema
pub fn load_workbook(path: &Path) -> CalcResult<Workbook> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let workbook: Workbook = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    validate_version(&workbook.meta.version)?;
    debug!(path = %path.display(), "workbook loaded");
    Ok(workbook)
}

/// Load a workbook and report who, if anyone, is editing it.
pub fn load_workbook_with_lock_check(path: &Path) -> CalcResult<(Workbook, Option<LockInfo>)> {
    let workbook = load_workbook(path)?;
    Ok((workbook, FileLock::check(path)))
}

/// Accept files from the same major version; within 0.x, refuse files
/// from a newer minor version.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file = parse(file_version);
    let current = parse(SCHEMA_VERSION);
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file.first(), current.first()) {
        (Some(f), Some(c)) if f == c => {}
        _ => return Err(mismatch()),
    }
    if current[0] == 0 {
        if let (Some(f), Some(c)) = (file.get(1), current.get(1)) {
            if f > c {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}

// ============================================================================
// Snapshot store
// ============================================================================

/// Somewhere a workbook snapshot can be loaded from and saved to.
pub trait SnapshotStore {
    fn load(&self) -> CalcResult<Workbook>;
    fn save(&self, workbook: &Workbook) -> CalcResult<()>;
}

/// Workbook stored as a `.cennik` JSON file, locked for the duration of
/// each save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    user_id: String,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, user_id: impl Into<String>) -> Self {
        JsonFileStore {
            path: path.into(),
            user_id: user_id.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the workbook, or start from the builtin price lists when the
    /// file does not exist yet.
    pub fn load_or_builtin(&self) -> CalcResult<Workbook> {
        if self.exists() {
            self.load()
        } else {
            debug!(path = %self.path.display(), "no workbook yet, using builtin data");
            Workbook::with_builtin_data(self.user_id.clone())
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> CalcResult<Workbook> {
        load_workbook(&self.path)
    }

    fn save(&self, workbook: &Workbook) -> CalcResult<()> {
        let _lock = FileLock::acquire(&self.path, self.user_id.clone())?;
        save_workbook(workbook, &self.path)
    }
}
