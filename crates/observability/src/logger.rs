//! The logger and its process-wide instance.

use core::fmt;
use std::io::{self, Write};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::caller::{CallSite, CallerTag};
use crate::config::{LogConfig, LogLevel};
use crate::error::LoggerError;
use crate::record::{Field, LogRecord};
use crate::sink::Sink;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Leveled JSON logger bound to one sink.
///
/// Safe to share across threads; every call writes and flushes its record
/// before returning and never reports failure to the caller.
pub struct Logger {
    config: LogConfig,
    sink: Sink,
    failures: AtomicU64,
}

impl Logger {
    /// Builds a logger writing to `config.output`.
    pub fn new(config: LogConfig) -> Result<Self, LoggerError> {
        let sink = Sink::open(&config.output)?;
        Ok(Self::with_sink(config, sink))
    }

    /// Builds a logger from `LOG_LEVEL` / `LOG_OUTPUT`.
    pub fn from_env() -> Result<Self, LoggerError> {
        Self::new(LogConfig::from_env())
    }

    /// Builds a logger writing to an arbitrary writer; `config.output` is
    /// kept for reference only.
    pub fn with_writer<W>(config: LogConfig, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::with_sink(config, Sink::from_writer(Box::new(writer)))
    }

    fn with_sink(config: LogConfig, sink: Sink) -> Self {
        Self {
            config,
            sink,
            failures: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.config.enabled(level)
    }

    pub fn debug(&self, site: CallSite<'_>, message: &str, fields: &[Field]) {
        self.log(LogLevel::Debug, site.tag(), message, fields, None);
    }

    pub fn info(&self, site: CallSite<'_>, message: &str, fields: &[Field]) {
        self.log(LogLevel::Info, site.tag(), message, fields, None);
    }

    /// Emits an error record with `err`'s message under the `error` key.
    pub fn error(&self, site: CallSite<'_>, message: &str, err: &dyn fmt::Display, fields: &[Field]) {
        self.log(LogLevel::Error, site.tag(), message, fields, Some(err.to_string()));
    }

    /// Number of records lost to sink failures so far.
    pub fn sink_failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub(crate) fn log(
        &self,
        level: LogLevel,
        caller: CallerTag,
        message: &str,
        fields: &[Field],
        error: Option<String>,
    ) {
        if !self.enabled(level) {
            return;
        }
        let record = LogRecord {
            level,
            time: Utc::now(),
            message,
            caller,
            fields,
            error,
        };
        let written = record
            .encode()
            .map_err(io::Error::from)
            .and_then(|line| self.sink.write_line(&line));
        if let Err(err) = written {
            self.report_failure(&err);
        }
    }

    fn report_failure(&self, err: &io::Error) {
        // Only the first failure is reported; the count keeps the rest.
        if self.failures.fetch_add(1, Ordering::Relaxed) == 0 {
            let _ = writeln!(io::stderr(), "bookstore-observability: dropping log records: {err}");
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .field("failures", &self.sink_failures())
            .finish_non_exhaustive()
    }
}

impl AsRef<Logger> for Logger {
    fn as_ref(&self) -> &Logger {
        self
    }
}

/// Eagerly initializes the process-wide logger from the environment.
///
/// Call this first thing in `main` to fail startup with a typed error instead
/// of a panic on the first logging call. Later calls return the same logger.
pub fn init() -> Result<&'static Logger, LoggerError> {
    if let Some(logger) = GLOBAL.get() {
        return Ok(logger);
    }
    let logger = Logger::from_env()?;
    Ok(GLOBAL.get_or_init(|| logger))
}

/// The process-wide logger, initialized from the environment on first use.
///
/// # Panics
///
/// Panics if the configured output cannot be opened: the process must not run
/// with a half-built logger.
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(|| match Logger::from_env() {
        Ok(logger) => logger,
        Err(err) => panic!("logger initialization failed: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputTarget;
    use crate::test_support::SharedBuffer;
    use std::sync::Arc;

    fn logger_at(level: LogLevel) -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let config = LogConfig::new(level, OutputTarget::Stdout);
        (Logger::with_writer(config, buffer.clone()), buffer)
    }

    #[test]
    fn info_record_carries_message_level_and_caller() {
        let (logger, buffer) = logger_at(LogLevel::Info);
        logger.info(CallSite::new("shop::cart::add", "src/cart.rs", 12), "hello", &[]);

        let lines = buffer.json_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["msg"], "hello");
        assert_eq!(lines[0]["level"], "info");
        assert_eq!(lines[0]["caller"], "cart/cart.rs - add : 12");
        assert!(lines[0]["time"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn error_record_nests_the_error_message() {
        let (logger, buffer) = logger_at(LogLevel::Info);
        let err = io::Error::other("disk full");
        logger.error(
            CallSite::new("shop::store::save", "src/store.rs", 3),
            "failed",
            &err,
            &[Field::new("attempt", 2)],
        );

        let lines = buffer.json_lines();
        assert_eq!(lines[0]["msg"], "failed");
        assert_eq!(lines[0]["level"], "error");
        assert_eq!(lines[0]["error"], "disk full");
        assert_eq!(lines[0]["attempt"], 2);
    }

    #[test]
    fn records_below_the_minimum_are_dropped() {
        let (logger, buffer) = logger_at(LogLevel::Error);
        let site = CallSite::new("a::b", "b.rs", 1);
        logger.debug(site, "noise", &[]);
        logger.info(site, "chatter", &[]);
        logger.error(site, "boom", &"cause", &[]);

        let lines = buffer.json_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["msg"], "boom");
    }

    #[test]
    fn debug_records_pass_at_debug_level() {
        let (logger, buffer) = logger_at(LogLevel::Debug);
        logger.debug(CallSite::new("a::b", "b.rs", 1), "detail", &[]);
        assert_eq!(buffer.json_lines()[0]["level"], "debug");
    }

    #[test]
    fn sink_failures_are_swallowed_and_counted() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let logger = Logger::with_writer(LogConfig::default(), Broken);
        let site = CallSite::new("a::b", "b.rs", 1);
        logger.info(site, "one", &[]);
        logger.error(site, "two", &"x", &[]);
        assert_eq!(logger.sink_failures(), 2);
    }

    #[test]
    fn concurrent_records_never_interleave() {
        let (logger, buffer) = logger_at(LogLevel::Info);
        let logger = Arc::new(logger);
        let payload = "x".repeat(512);

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let logger = Arc::clone(&logger);
                let payload = payload.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let site = CallSite::new("load::worker::run", "worker.rs", i);
                        if i % 2 == 0 {
                            logger.info(site, &payload, &[Field::new("worker", worker)]);
                        } else {
                            logger.error(site, &payload, &"odd", &[Field::new("worker", worker)]);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let lines = buffer.json_lines();
        assert_eq!(lines.len(), 8 * 50);
        assert!(lines.iter().all(|line| line["msg"] == payload.as_str()));
    }

    #[test]
    fn unopenable_output_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");
        let config = LogConfig::new(LogLevel::Info, OutputTarget::Path(path));
        assert!(matches!(Logger::new(config), Err(LoggerError::OpenOutput { .. })));
    }
}
