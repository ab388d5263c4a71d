//! Command domain model and date-tag normalization.
//!
//! # Responsibility
//! - Represent a raw financial-event command as opaque text.
//! - Detect an existing `-d YYYY-MM-DD` date tag anywhere in the text.
//! - Append the caller-supplied date when no tag is present.
//!
//! # Invariants
//! - Normalization never fails and never rewrites existing text.
//! - Normalizing an already-dated command is a no-op.
//! - Injected tags are always the trailing ` -d YYYY-MM-DD` suffix.

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// Flag literal that introduces a date tag inside a command.
pub const DATE_FLAG: &str = "-d";
/// `strftime` layout of a tag date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Unanchored on purpose: a tag glued to another word still counts.
static DATE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-d\s(\d{4}-\d{2}-\d{2})").expect("valid date tag regex"));

/// Source of the current calendar date used for tag injection.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date. Used by tests and replay tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Raw command text as received from the caller.
///
/// The body is kept untyped; income/expense grammar is not validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    text: String,
}

impl Command {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Returns the date of the first tag found in the text, if any.
    pub fn date_tag(&self) -> Option<&str> {
        find_date_tag(&self.text)
    }

    pub fn has_date_tag(&self) -> bool {
        DATE_TAG_RE.is_match(&self.text)
    }

    /// Converts this command into its dated form.
    ///
    /// # Contract
    /// - Tagged text is returned unchanged, wherever the tag sits.
    /// - Untagged text gets ` -d <now>` appended.
    pub fn normalize(self, now: NaiveDate) -> NormalizedCommand {
        if self.has_date_tag() {
            return NormalizedCommand {
                text: self.text,
                was_tagged: false,
            };
        }

        let mut text = self.text;
        text.push_str(&format_date_tag(now));
        NormalizedCommand {
            text,
            was_tagged: true,
        }
    }
}

impl From<&str> for Command {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Command {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Command text guaranteed to carry at least one date tag.
///
/// Only produced by [`Command::normalize`], so every value is safe to persist
/// as a log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCommand {
    text: String,
    was_tagged: bool,
}

impl NormalizedCommand {
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Returns `true` when normalization injected the date tag.
    pub fn was_tagged(&self) -> bool {
        self.was_tagged
    }

    /// Returns the date of the first tag in the record.
    pub fn date(&self) -> Option<&str> {
        find_date_tag(&self.text)
    }
}

impl Display for NormalizedCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for NormalizedCommand {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Normalizes raw command text against `now`.
///
/// String-level shorthand for `Command::new(command).normalize(now)`.
pub fn normalize(command: &str, now: NaiveDate) -> String {
    Command::new(command).normalize(now).into_string()
}

/// Finds the first date tag in `command` and returns its `YYYY-MM-DD` part.
pub fn find_date_tag(command: &str) -> Option<&str> {
    DATE_TAG_RE
        .captures(command)
        .and_then(|captures| captures.get(1))
        .map(|date| date.as_str())
}

/// Renders the canonical trailing tag, e.g. ` -d 2024-03-01`.
pub fn format_date_tag(date: NaiveDate) -> String {
    format!(" {DATE_FLAG} {}", date.format(DATE_FORMAT))
}
