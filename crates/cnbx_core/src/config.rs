//! Runtime configuration for the send entry point.
//!
//! # Responsibility
//! - Resolve the output directory from an explicit value or the environment.
//! - Report missing configuration before any core logic runs.
//!
//! # Invariants
//! - Environment access happens only through `Config::from_env`.
//! - A resolved `Config` always holds a non-blank output directory.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable naming the command log directory.
pub const OUTPUT_DIR_ENV: &str = "CNBX_OUTPUT_DIR";
/// Flag name reported when an explicit output directory is blank.
pub const OUTPUT_DIR_FLAG: &str = "--output-dir";
/// Environment variable overriding the diagnostics level.
pub const LOG_LEVEL_ENV: &str = "CNBX_LOG_LEVEL";
/// Environment variable enabling file diagnostics in the given directory.
pub const LOG_DIR_ENV: &str = "CNBX_LOG_DIR";

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration failure detected before the core is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingOutputDir { var: &'static str },
    /// `origin` names where the blank value came from: a flag or a variable.
    EmptyOutputDir { origin: &'static str },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingOutputDir { var } => {
                write!(f, "please define environment variable {var}")
            }
            Self::EmptyOutputDir { origin } => {
                write!(f, "output directory from {origin} must not be blank")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved configuration passed into the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub output_dir: PathBuf,
}

impl Config {
    /// Resolves configuration from the process environment.
    ///
    /// `output_dir_override` (e.g. a CLI flag) wins over `CNBX_OUTPUT_DIR`.
    pub fn from_env(output_dir_override: Option<PathBuf>) -> ConfigResult<Self> {
        Self::from_lookup(output_dir_override, |key| std::env::var(key).ok())
    }

    /// Resolves configuration with an injected variable lookup.
    ///
    /// # Errors
    /// - `MissingOutputDir` when neither override nor variable is set.
    /// - `EmptyOutputDir` when the chosen value is blank.
    pub fn from_lookup<F>(output_dir_override: Option<PathBuf>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (output_dir, origin) = match output_dir_override {
            Some(path) => (path, OUTPUT_DIR_FLAG),
            None => {
                let path = lookup(OUTPUT_DIR_ENV)
                    .map(PathBuf::from)
                    .ok_or(ConfigError::MissingOutputDir {
                        var: OUTPUT_DIR_ENV,
                    })?;
                (path, OUTPUT_DIR_ENV)
            }
        };

        if is_blank(&output_dir) {
            return Err(ConfigError::EmptyOutputDir { origin });
        }

        Ok(Self { output_dir })
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str()
        .to_str()
        .map(|value| value.trim().is_empty())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError, OUTPUT_DIR_ENV, OUTPUT_DIR_FLAG};
    use std::path::PathBuf;

    fn env_with(value: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            assert_eq!(key, OUTPUT_DIR_ENV);
            value.map(str::to_string)
        }
    }

    #[test]
    fn resolves_output_dir_from_lookup() {
        let config = Config::from_lookup(None, env_with(Some("/var/cnbx"))).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/var/cnbx"));
    }

    #[test]
    fn override_wins_over_environment() {
        let config =
            Config::from_lookup(Some(PathBuf::from("/tmp/flag")), env_with(Some("/var/cnbx")))
                .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/flag"));
    }

    #[test]
    fn missing_variable_is_reported() {
        let err = Config::from_lookup(None, env_with(None)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingOutputDir {
                var: OUTPUT_DIR_ENV
            }
        );
        assert!(err.to_string().contains(OUTPUT_DIR_ENV));
    }

    #[test]
    fn blank_variable_is_rejected() {
        let err = Config::from_lookup(None, env_with(Some("   "))).unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyOutputDir {
                origin: OUTPUT_DIR_ENV
            }
        );
        assert!(err.to_string().contains(OUTPUT_DIR_ENV));
    }

    #[test]
    fn blank_flag_is_reported_as_flag() {
        let err = Config::from_lookup(Some(PathBuf::from("")), env_with(Some("/var/cnbx")))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyOutputDir {
                origin: OUTPUT_DIR_FLAG
            }
        );
        assert!(err.to_string().contains("--output-dir"));
        assert!(!err.to_string().contains(OUTPUT_DIR_ENV));
    }
}
