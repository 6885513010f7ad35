//! Structured JSON logging with automatic caller tags.
//!
//! The process-wide [`Logger`] is configured from `LOG_LEVEL` and `LOG_OUTPUT`
//! on first use (or eagerly through [`init`]). The [`info!`], [`error!`] and
//! [`debug!`] macros capture their call site, so every record carries a
//! `caller` of the form `"<package>/<file> - <function> : <line>"`.
//!
//! ```ignore
//! fn main() -> Result<(), bookstore_observability::LoggerError> {
//!     bookstore_observability::install()?;
//!     bookstore_observability::info!("server starting", port = 8080);
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod caller;
pub mod config;
pub mod error;
pub mod logger;
pub mod print;
pub mod record;

mod sink;

#[cfg(test)]
mod test_support;

use tracing_subscriber::prelude::*;

pub use bridge::FacilityLayer;
pub use caller::{CallSite, CallerTag};
pub use config::{ENV_LOG_LEVEL, ENV_LOG_OUTPUT, LogConfig, LogLevel, OutputTarget};
pub use error::LoggerError;
pub use logger::{Logger, global, init};
pub use print::{PrintLogger, print_logger};
pub use record::Field;

/// Initializes the process-wide logger and registers it as the global
/// `tracing` subscriber.
///
/// Fails if the output cannot be opened or another subscriber is already
/// installed; in the latter case the facility itself remains usable.
pub fn install() -> Result<&'static Logger, LoggerError> {
    let logger = init()?;
    tracing_subscriber::registry()
        .with(FacilityLayer::new(logger))
        .try_init()?;
    Ok(logger)
}

/// Logs at debug level.
///
/// Accepts the same forms as [`info!`].
#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, $message:expr $(, $key:ident = $value:expr)* $(,)?) => {{
        let logger = &$logger;
        let logger: &$crate::Logger = ::core::convert::AsRef::as_ref(logger);
        if logger.enabled($crate::LogLevel::Debug) {
            logger.debug(
                $crate::call_site!(),
                ::core::convert::AsRef::<str>::as_ref(&$message),
                &[$($crate::Field::new(::core::stringify!($key), &$value)),*],
            );
        }
    }};
    ($message:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::debug!(logger: $crate::global(), $message $(, $key = $value)*)
    };
}

/// Logs at info level.
///
/// ```ignore
/// info!("order placed");
/// info!("order placed", order_id = id, total = cents);
/// info!(logger: my_logger, "order placed", order_id = id);
/// ```
#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $message:expr $(, $key:ident = $value:expr)* $(,)?) => {{
        let logger = &$logger;
        let logger: &$crate::Logger = ::core::convert::AsRef::as_ref(logger);
        if logger.enabled($crate::LogLevel::Info) {
            logger.info(
                $crate::call_site!(),
                ::core::convert::AsRef::<str>::as_ref(&$message),
                &[$($crate::Field::new(::core::stringify!($key), &$value)),*],
            );
        }
    }};
    ($message:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::info!(logger: $crate::global(), $message $(, $key = $value)*)
    };
}

/// Logs at error level, attaching `err`'s message under the `error` key.
///
/// `err` is anything implementing `Display`.
#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $message:expr, $err:expr $(, $key:ident = $value:expr)* $(,)?) => {{
        let logger = &$logger;
        let logger: &$crate::Logger = ::core::convert::AsRef::as_ref(logger);
        if logger.enabled($crate::LogLevel::Error) {
            logger.error(
                $crate::call_site!(),
                ::core::convert::AsRef::<str>::as_ref(&$message),
                &$err,
                &[$($crate::Field::new(::core::stringify!($key), &$value)),*],
            );
        }
    }};
    ($message:expr, $err:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::error!(logger: $crate::global(), $message, $err $(, $key = $value)*)
    };
}

/// Print-style logging at info level.
///
/// A lone literal is logged verbatim, braces included; with arguments the
/// literal is used as a `format!` string.
#[macro_export]
macro_rules! printf {
    (logger: $logger:expr, $format:literal $(,)?) => {
        $crate::info!(logger: $logger, $format)
    };
    (logger: $logger:expr, $format:literal, $($arg:tt)+) => {
        $crate::info!(logger: $logger, ::std::format!($format, $($arg)+))
    };
    ($format:literal $(,)?) => {
        $crate::printf!(logger: $crate::global(), $format)
    };
    ($format:literal, $($arg:tt)+) => {
        $crate::printf!(logger: $crate::global(), $format, $($arg)+)
    };
}
