//! `cnbx-send` entry point.
//!
//! # Responsibility
//! - Parse the single command argument and resolve configuration.
//! - Bootstrap diagnostics logging before invoking the core.
//! - Reject multi-line input so one command stays one log line.
//! - Map usage, configuration and storage failures to exit codes.

use clap::Parser;
use cnbx_core::config::{LOG_DIR_ENV, LOG_LEVEL_ENV};
use cnbx_core::{default_log_level, init_logging, send_command, Config, ConfigResult};
use log::error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_SUCCESS: u8 = 0;
const EXIT_STORAGE_ERROR: u8 = 1;
const EXIT_CONFIG_ERROR: u8 = 2;
/// `EX_USAGE` from sysexits.h.
const EXIT_USAGE_ERROR: u8 = 64;

/// Sends a command to the application.
///
/// Incomes are written as "+<amount> <comment?>", expenses as
/// "<amount> <category> <comment?>". Add "-d YYYY-MM-DD" inside the command
/// to set its date; today's date is used otherwise.
#[derive(Parser, Debug)]
#[command(name = "cnbx-send", version)]
struct Cli {
    /// A complete command string
    #[arg(allow_hyphen_values = true)]
    command: String,

    /// Directory holding state.cnbx (defaults to $CNBX_OUTPUT_DIR)
    #[arg(long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Diagnostics level: off|trace|debug|info|warn|error
    #[arg(long = "log-level", env = LOG_LEVEL_ENV)]
    log_level: Option<String>,

    /// Absolute directory for rotating diagnostics files (stderr otherwise)
    #[arg(long = "log-dir", env = LOG_DIR_ENV)]
    log_dir: Option<String>,

    /// Do not echo the written record
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, cli.log_dir.as_deref()) {
        eprintln!("error: {err}");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    let code = run(
        cli,
        Config::from_env,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    ExitCode::from(code)
}

/// Executes one send and returns the process exit code.
///
/// # Contract
/// - Commands containing `\n` or `\r` are rejected before the core runs.
/// - Configuration is resolved only after the command is accepted.
/// - On success the record is echoed to `out` unless `--quiet` is set.
fn run<F>(cli: Cli, resolve_config: F, out: &mut dyn Write, err: &mut dyn Write) -> u8
where
    F: FnOnce(Option<PathBuf>) -> ConfigResult<Config>,
{
    if let Err(message) = check_single_line(&cli.command) {
        error!("event=command_check module=cli status=error error={message}");
        let _ = writeln!(err, "error: {message}");
        return EXIT_USAGE_ERROR;
    }

    let config = match resolve_config(cli.output_dir) {
        Ok(config) => config,
        Err(config_err) => {
            error!("event=config_load module=cli status=error error={config_err}");
            let _ = writeln!(err, "error: {config_err}");
            return EXIT_CONFIG_ERROR;
        }
    };

    match send_command(&cli.command, config.output_dir) {
        Ok(outcome) => {
            if !cli.quiet {
                let _ = writeln!(out, "{}", outcome.record);
            }
            EXIT_SUCCESS
        }
        Err(store_err) => {
            let _ = writeln!(err, "error: {store_err}");
            EXIT_STORAGE_ERROR
        }
    }
}

fn check_single_line(command: &str) -> Result<(), String> {
    if command.contains(['\n', '\r']) {
        return Err("command must be a single line; line breaks are not allowed".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        check_single_line, run, Cli, EXIT_CONFIG_ERROR, EXIT_STORAGE_ERROR, EXIT_SUCCESS,
        EXIT_USAGE_ERROR,
    };
    use clap::Parser;
    use cnbx_core::{read_records, Config, ConfigResult, LOG_FILE_NAME};
    use std::path::{Path, PathBuf};

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["cnbx-send"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn no_env(output_dir: Option<PathBuf>) -> ConfigResult<Config> {
        Config::from_lookup(output_dir, |_| None)
    }

    fn run_captured(cli: Cli) -> (u8, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(cli, no_env, &mut out, &mut err);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn dir_arg(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    #[test]
    fn check_single_line_rejects_line_breaks() {
        assert!(check_single_line("+1 a").is_ok());
        assert!(check_single_line("+1 a\n-5 food").is_err());
        assert!(check_single_line("+1 a\r").is_err());
    }

    #[test]
    fn success_echoes_record_and_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let cli = parse(&[
            "--output-dir",
            dir_arg(dir.path()),
            "45.00 groceries lunch -d 2023-12-25",
        ]);

        let (code, out, err) = run_captured(cli);

        assert_eq!(code, EXIT_SUCCESS);
        assert_eq!(out, "45.00 groceries lunch -d 2023-12-25\n");
        assert!(err.is_empty());
        assert_eq!(
            read_records(dir.path()).unwrap(),
            vec!["45.00 groceries lunch -d 2023-12-25"]
        );
    }

    #[test]
    fn quiet_suppresses_echo() {
        let dir = tempfile::tempdir().unwrap();
        let cli = parse(&["--quiet", "--output-dir", dir_arg(dir.path()), "+7 tips"]);

        let (code, out, _) = run_captured(cli);

        assert_eq!(code, EXIT_SUCCESS);
        assert!(out.is_empty());
        let records = read_records(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].starts_with("+7 tips -d "));
    }

    #[test]
    fn multi_line_command_is_usage_error_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cli = parse(&["--output-dir", dir_arg(dir.path()), "+1 a\n-5 food"]);

        let (code, out, err) = run_captured(cli);

        assert_eq!(code, EXIT_USAGE_ERROR);
        assert!(out.is_empty());
        assert!(err.contains("single line"));
        assert!(!dir.path().join(LOG_FILE_NAME).exists());
    }

    #[test]
    fn missing_output_dir_is_config_error() {
        let (code, out, err) = run_captured(parse(&["+1 a"]));

        assert_eq!(code, EXIT_CONFIG_ERROR);
        assert!(out.is_empty());
        assert!(err.starts_with("error: "));
    }

    #[test]
    fn storage_failure_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let occupied = dir.path().join("occupied");
        std::fs::write(&occupied, "plain file").unwrap();
        let cli = parse(&["--output-dir", dir_arg(&occupied), "+1 a"]);

        let (code, out, err) = run_captured(cli);

        assert_eq!(code, EXIT_STORAGE_ERROR);
        assert!(out.is_empty());
        assert!(err.contains("failed to create directory"));
    }
}
