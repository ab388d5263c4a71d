//! Send use-case service.
//!
//! # Responsibility
//! - Turn a raw command into a dated record and persist it.
//! - Keep clock and storage behind injectable seams.
//!
//! # Invariants
//! - One `send` call appends exactly one record or appends nothing.
//! - The service never reads process environment.

use crate::model::command::{Clock, Command, LocalClock, NormalizedCommand};
use crate::store::{AppendReceipt, CommandLog, FileCommandLog, StoreResult};
use log::info;
use std::path::PathBuf;

/// Outcome of a successful send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    /// Record exactly as it was written, without the trailing newline.
    pub record: NormalizedCommand,
    pub receipt: AppendReceipt,
}

/// Use-case service that normalizes and records commands.
pub struct SendService<L: CommandLog, C: Clock> {
    log: L,
    clock: C,
}

impl SendService<FileCommandLog, LocalClock> {
    /// Creates a service writing into `output_dir` with the host clock.
    pub fn for_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self::new(FileCommandLog::new(output_dir), LocalClock)
    }
}

impl<L: CommandLog, C: Clock> SendService<L, C> {
    pub fn new(log: L, clock: C) -> Self {
        Self { log, clock }
    }

    /// Normalizes `raw` against today's date and appends it.
    ///
    /// # Contract
    /// - Already-dated commands are stored verbatim.
    /// - Storage errors are returned unchanged; nothing is queued for retry.
    pub fn send(&self, raw: &str) -> StoreResult<SendOutcome> {
        let record = Command::new(raw).normalize(self.clock.today());
        let receipt = self.log.append(&record)?;
        info!(
            "event=command_send module=service status=ok tagged={} command={} path={}",
            record.was_tagged(),
            record,
            receipt.path.display()
        );
        Ok(SendOutcome { record, receipt })
    }

    pub fn log(&self) -> &L {
        &self.log
    }
}

/// Normalizes `raw` with the host clock and appends it under `output_dir`.
///
/// Entry point for callers that already resolved their configuration.
pub fn send_command(raw: &str, output_dir: impl Into<PathBuf>) -> StoreResult<SendOutcome> {
    SendService::for_dir(output_dir).send(raw)
}
