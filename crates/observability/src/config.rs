//! Logger configuration, resolved once from the environment.

use core::fmt;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use serde::Serialize;

/// Environment variable selecting the minimum emitted level.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Environment variable selecting the output target.
pub const ENV_LOG_OUTPUT: &str = "LOG_OUTPUT";

/// Fixed JSON keys of every record.
pub mod keys {
    pub const MESSAGE: &str = "msg";
    pub const LEVEL: &str = "level";
    pub const TIME: &str = "time";
    pub const CALLER: &str = "caller";
    pub const ERROR: &str = "error";

    pub(crate) const RESERVED: [&str; 5] = [MESSAGE, LEVEL, TIME, CALLER, ERROR];
}

/// Severity of a record. Ordered from most to least verbose.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Error,
}

impl LogLevel {
    /// Parses a level selector. Unrecognized input (including empty) is `Info`.
    pub fn from_selector(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "debug" => Self::Debug,
            "info" => Self::Info,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where records are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputTarget {
    #[default]
    Stdout,
    Stderr,
    /// File path, opened in create+append mode.
    Path(PathBuf),
}

impl OutputTarget {
    /// Parses an output selector. Empty or whitespace-only input is stdout.
    pub fn from_selector(raw: &str) -> Self {
        match raw.trim() {
            "" | "stdout" => Self::Stdout,
            "stderr" => Self::Stderr,
            path => Self::Path(PathBuf::from(path)),
        }
    }

    /// Parses a raw environment value. Non-UTF-8 input is kept verbatim as a
    /// path.
    pub fn from_os_selector(raw: &OsStr) -> Self {
        match raw.to_str() {
            Some(text) => Self::from_selector(text),
            None => Self::Path(PathBuf::from(raw)),
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolved logger configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub output: OutputTarget,
}

impl LogConfig {
    pub fn new(level: LogLevel, output: OutputTarget) -> Self {
        Self { level, output }
    }

    /// Resolves `LOG_LEVEL` and `LOG_OUTPUT` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Resolves the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let level = lookup(ENV_LOG_LEVEL).unwrap_or_default();
        let output = lookup(ENV_LOG_OUTPUT).unwrap_or_default();
        Self {
            level: LogLevel::from_selector(&level.to_string_lossy()),
            output: OutputTarget::from_os_selector(&output),
        }
    }

    /// Whether a record at `level` passes the configured minimum.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }
}
