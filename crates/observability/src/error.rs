//! Logger error model.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to bring the logging facility up.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The configured output could not be opened for writing.
    #[error("cannot open log output `{}`: {source}", .path.display())]
    OpenOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Another global `tracing` subscriber was installed first.
    #[error("a global tracing subscriber is already installed")]
    SubscriberInstalled(#[from] tracing_subscriber::util::TryInitError),
}
