//! Core logic for the CommandBox send tool.
//! Dates financial-event commands and appends them to the `state.cnbx` log.

pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{Config, ConfigError, ConfigResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::command::{
    find_date_tag, format_date_tag, normalize, Clock, Command, FixedClock, LocalClock,
    NormalizedCommand,
};
pub use service::send_service::{send_command, SendOutcome, SendService};
pub use store::{
    append, read_records, AppendReceipt, CommandLog, FileCommandLog, StoreError, StoreResult,
    LOG_FILE_NAME,
};
