//! File-backed command log.
//!
//! # Responsibility
//! - Create the output directory on demand.
//! - Append exactly one newline-terminated record per call.
//! - Serialize cooperating writers with an exclusive advisory lock.
//!
//! # Invariants
//! - The file is opened with `append(true)` and never truncated.
//! - Record plus `\n` is written with a single `write_all`.
//! - The file handle (and its lock) is released on every exit path.

use super::{StoreError, StoreResult, LOG_FILE_NAME};
use crate::model::command::NormalizedCommand;
use fs2::FileExt;
use log::{debug, error, info};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Result of one successful append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendReceipt {
    /// Resolved log file path.
    pub path: PathBuf,
    /// Byte offset where the new record starts.
    pub offset: u64,
    /// Bytes written, including the trailing newline.
    pub len: u64,
}

/// Storage contract for normalized command records.
pub trait CommandLog {
    fn append(&self, record: &NormalizedCommand) -> StoreResult<AppendReceipt>;
}

/// Command log stored as `<dir>/state.cnbx`.
#[derive(Debug, Clone)]
pub struct FileCommandLog {
    dir: PathBuf,
}

impl FileCommandLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn log_path(&self) -> PathBuf {
        log_path(&self.dir)
    }

    /// Reads every record currently in the log, oldest first.
    pub fn records(&self) -> StoreResult<Vec<String>> {
        read_records(&self.dir)
    }
}

impl CommandLog for FileCommandLog {
    fn append(&self, record: &NormalizedCommand) -> StoreResult<AppendReceipt> {
        append(record.as_str(), &self.dir)
    }
}

/// Appends `record` as a new line to `<directory>/state.cnbx`.
///
/// # Side effects
/// - Creates `directory` and missing parents.
/// - Grows the log file by exactly `record.len() + 1` bytes.
/// - Emits `log_append` logging events with duration and status.
///
/// # Errors
/// - `StoreError::CreateDir` when the directory cannot be created.
/// - `StoreError::Open`, `Lock` or `Write` when the file cannot be appended.
pub fn append(record: &str, directory: &Path) -> StoreResult<AppendReceipt> {
    let started_at = Instant::now();
    let path = log_path(directory);
    info!(
        "event=log_append module=store status=start path={}",
        path.display()
    );

    match append_locked(record, directory, &path) {
        Ok(receipt) => {
            info!(
                "event=log_append module=store status=ok path={} offset={} bytes={} duration_ms={}",
                receipt.path.display(),
                receipt.offset,
                receipt.len,
                started_at.elapsed().as_millis()
            );
            Ok(receipt)
        }
        Err(err) => {
            error!(
                "event=log_append module=store status=error path={} duration_ms={} error_code={} error={}",
                path.display(),
                started_at.elapsed().as_millis(),
                err.code(),
                err
            );
            Err(err)
        }
    }
}

/// Reads all records from `<directory>/state.cnbx`.
///
/// A missing file yields an empty list.
pub fn read_records(directory: &Path) -> StoreResult<Vec<String>> {
    let path = log_path(directory);
    match fs::read_to_string(&path) {
        Ok(contents) => Ok(contents.lines().map(str::to_string).collect()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(StoreError::Read { path, source }),
    }
}

fn log_path(directory: &Path) -> PathBuf {
    directory.join(LOG_FILE_NAME)
}

fn append_locked(record: &str, directory: &Path, path: &Path) -> StoreResult<AppendReceipt> {
    fs::create_dir_all(directory).map_err(|source| StoreError::CreateDir {
        path: directory.to_path_buf(),
        source,
    })?;

    let file = open_append(path)?;
    file.lock_exclusive().map_err(|source| StoreError::Lock {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "event=log_lock module=store status=ok path={}",
        path.display()
    );

    // Dropping `file` closes the descriptor, which also releases the lock.
    write_record(file, record, path)
}

fn open_append(path: &Path) -> StoreResult<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn write_record(mut file: File, record: &str, path: &Path) -> StoreResult<AppendReceipt> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    // Offset must be read under the lock to reflect other writers' lines.
    let offset = file.metadata().map_err(write_err)?.len();

    let mut line = String::with_capacity(record.len() + 1);
    line.push_str(record);
    line.push('\n');

    file.write_all(line.as_bytes()).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    file.sync_data().map_err(write_err)?;

    Ok(AppendReceipt {
        path: path.to_path_buf(),
        offset,
        len: line.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::{append, log_path, read_records};
    use crate::store::{StoreError, LOG_FILE_NAME};

    #[test]
    fn log_path_uses_fixed_file_name() {
        let path = log_path(std::path::Path::new("/tmp/out"));
        assert!(path.ends_with(LOG_FILE_NAME));
    }

    #[test]
    fn read_records_on_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_records(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn receipt_tracks_offsets_across_appends() {
        let dir = tempfile::tempdir().unwrap();

        let first = append("+10 a -d 2024-03-01", dir.path()).unwrap();
        assert_eq!(first.offset, 0);
        assert_eq!(first.len, 20);

        let second = append("-5 food b -d 2024-03-01", dir.path()).unwrap();
        assert_eq!(second.offset, 20);
        assert_eq!(second.len, 24);
    }

    #[test]
    fn directory_blocked_by_file_is_create_dir_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a dir").unwrap();

        let err = append("+1 x -d 2024-01-01", &blocker.join("nested")).unwrap_err();
        assert!(matches!(err, StoreError::CreateDir { .. }), "unexpected error: {err}");
        assert_eq!(err.code(), "create_dir_failed");
    }
}
