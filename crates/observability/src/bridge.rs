//! `tracing` integration: routes `tracing` events into a [`Logger`].

use core::fmt;

use serde_json::Value;
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::caller::CallSite;
use crate::config::{LogLevel, keys};
use crate::logger::Logger;
use crate::record::Field;

/// Layer writing every enabled `tracing` event through a [`Logger`].
///
/// The function segment of the caller tag is the innermost span's name, which
/// `#[instrument]` sets to the function name.
#[derive(Debug, Clone)]
pub struct FacilityLayer<L> {
    logger: L,
}

impl<L> FacilityLayer<L>
where
    L: AsRef<Logger>,
{
    pub fn new(logger: L) -> Self {
        Self { logger }
    }
}

fn level_of(level: Level) -> LogLevel {
    match level {
        Level::TRACE | Level::DEBUG => LogLevel::Debug,
        Level::INFO | Level::WARN => LogLevel::Info,
        Level::ERROR => LogLevel::Error,
    }
}

impl<S, L> Layer<S> for FacilityLayer<L>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    L: AsRef<Logger> + 'static,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let logger = self.logger.as_ref();
        let metadata = event.metadata();
        let level = level_of(*metadata.level());
        if !logger.enabled(level) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let function = ctx.event_span(event).map(|span| span.name()).unwrap_or("unknown");
        let path = format!("{}::{function}", metadata.module_path().unwrap_or_default());
        let site = CallSite::new(
            &path,
            metadata.file().unwrap_or_default(),
            metadata.line().unwrap_or_default(),
        );
        logger.log(level, site.tag(), &visitor.message, &visitor.fields, visitor.error);
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<Field>,
    error: Option<String>,
}

impl EventVisitor {
    fn record_value(&mut self, name: &str, value: Value) {
        match name {
            "message" => self.message = into_text(value),
            keys::ERROR => self.error = Some(into_text(value)),
            _ => self.fields.push(Field::from_value(name, value)),
        }
    }
}

fn into_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

impl Visit for EventVisitor {
    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.record_value(field.name(), Value::from(value));
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.record_value(field.name(), Value::from(value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.record_value(field.name(), Value::from(value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.record_value(field.name(), Value::from(value));
    }

    fn record_str(&mut self, field: &TracingField, value: &str) {
        self.record_value(field.name(), Value::from(value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.record_value(field.name(), Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        self.record_value(field.name(), Value::from(format!("{value:?}")));
    }
}
