//! Print-style adapter for callers that only know `print`/`printf`.
//!
//! Both calls log at info level with no structured fields. The caller tag of
//! the method forms carries file and line only; [`print_values!`] also names
//! the calling function.
//!
//! [`print_values!`]: crate::print_values

use core::fmt;
use std::panic::Location;

use crate::caller::CallSite;
use crate::logger::{Logger, global};

/// Object-safe print interface; the call site is passed in explicitly.
///
/// `print` and `printf` on [`Logger`] and on `dyn PrintLogger` capture the
/// site of their caller and forward here.
pub trait PrintLogger: Send + Sync {
    /// Logs the `Debug` representation of `values`.
    fn print_at(&self, site: CallSite<'_>, values: &[&dyn fmt::Debug]);

    /// Logs a formatted message; an argument-free message is passed through
    /// verbatim.
    fn printf_at(&self, site: CallSite<'_>, args: fmt::Arguments<'_>);
}

impl PrintLogger for Logger {
    fn print_at(&self, site: CallSite<'_>, values: &[&dyn fmt::Debug]) {
        self.info(site, &format!("{values:?}"), &[]);
    }

    fn printf_at(&self, site: CallSite<'_>, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(literal) => self.info(site, literal, &[]),
            None => self.info(site, &args.to_string(), &[]),
        }
    }
}

impl Logger {
    #[track_caller]
    pub fn print(&self, values: &[&dyn fmt::Debug]) {
        self.print_at(CallSite::from_location(Location::caller()), values);
    }

    #[track_caller]
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.printf_at(CallSite::from_location(Location::caller()), args);
    }
}

impl dyn PrintLogger + '_ {
    #[track_caller]
    pub fn print(&self, values: &[&dyn fmt::Debug]) {
        self.print_at(CallSite::from_location(Location::caller()), values);
    }

    #[track_caller]
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.printf_at(CallSite::from_location(Location::caller()), args);
    }
}

/// The process-wide logger, for print-style calls.
pub fn print_logger() -> &'static Logger {
    global()
}

/// Logs the `Debug` representation of its arguments at info level.
///
/// ```ignore
/// print_values!("isbn", 978, Some(2));
/// print_values!(logger: my_logger, "isbn", 978);
/// ```
#[macro_export]
macro_rules! print_values {
    (logger: $logger:expr $(, $value:expr)* $(,)?) => {{
        let logger = &$logger;
        let logger: &$crate::Logger = ::core::convert::AsRef::as_ref(logger);
        $crate::PrintLogger::print_at(
            logger,
            $crate::call_site!(),
            &[$(&$value as &dyn ::core::fmt::Debug),*],
        );
    }};
    ($($value:expr),* $(,)?) => {
        $crate::print_values!(logger: $crate::global() $(, $value)*)
    };
}
