//! Append-only command log storage.
//!
//! # Responsibility
//! - Define the storage contract used by the send use-case.
//! - Persist normalized commands into `<output_dir>/state.cnbx`.
//!
//! # Invariants
//! - Existing log bytes are never truncated or rewritten.
//! - Every failure surfaces as a `StoreError` carrying the affected path.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub mod command_log;

pub use command_log::{append, read_records, AppendReceipt, CommandLog, FileCommandLog};

/// Fixed file name of the command log inside the output directory.
pub const LOG_FILE_NAME: &str = "state.cnbx";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failure while persisting or reading command records.
#[derive(Debug)]
pub enum StoreError {
    /// Output directory (or one of its parents) could not be created.
    CreateDir { path: PathBuf, source: io::Error },
    /// Log file could not be opened for append.
    Open { path: PathBuf, source: io::Error },
    /// Exclusive advisory lock could not be acquired.
    Lock { path: PathBuf, source: io::Error },
    /// Record write or flush failed.
    Write { path: PathBuf, source: io::Error },
    /// Log file could not be read back.
    Read { path: PathBuf, source: io::Error },
}

impl StoreError {
    /// Path the failing operation targeted.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::CreateDir { path, .. }
            | Self::Open { path, .. }
            | Self::Lock { path, .. }
            | Self::Write { path, .. }
            | Self::Read { path, .. } => path,
        }
    }

    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CreateDir { .. } => "create_dir_failed",
            Self::Open { .. } => "open_failed",
            Self::Lock { .. } => "lock_failed",
            Self::Write { .. } => "write_failed",
            Self::Read { .. } => "read_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDir { path, source } => {
                write!(f, "failed to create directory `{}`: {source}", path.display())
            }
            Self::Open { path, source } => {
                write!(f, "failed to open command log `{}`: {source}", path.display())
            }
            Self::Lock { path, source } => {
                write!(f, "failed to lock command log `{}`: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "failed to write command log `{}`: {source}", path.display())
            }
            Self::Read { path, source } => {
                write!(f, "failed to read command log `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. }
            | Self::Open { source, .. }
            | Self::Lock { source, .. }
            | Self::Write { source, .. }
            | Self::Read { source, .. } => Some(source),
        }
    }
}
