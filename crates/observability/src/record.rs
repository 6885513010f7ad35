//! One log record and its JSON line encoding.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::caller::CallerTag;
use crate::config::{LogLevel, keys};

/// Caller-supplied structured field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: String,
    value: Value,
}

impl Field {
    /// Serializes `value` into the field. A value that cannot be represented
    /// as JSON is recorded as a string describing the failure.
    pub fn new(key: impl Into<String>, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|err| Value::String(format!("<unserializable: {err}>")));
        Self::from_value(key, value)
    }

    pub fn from_value(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LogRecord<'a> {
    pub level: LogLevel,
    pub time: DateTime<Utc>,
    pub message: &'a str,
    pub caller: CallerTag,
    pub fields: &'a [Field],
    pub error: Option<String>,
}

impl LogRecord<'_> {
    /// Encodes the record as a single newline-terminated JSON object.
    ///
    /// Structured fields whose key collides with a fixed key are dropped.
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        let mut object = Map::new();
        object.insert(keys::LEVEL.into(), Value::from(self.level.as_str()));
        object.insert(
            keys::TIME.into(),
            Value::from(self.time.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        object.insert(keys::MESSAGE.into(), Value::from(self.message));
        object.insert(keys::CALLER.into(), Value::from(self.caller.as_str()));
        for field in self.fields {
            if keys::RESERVED.contains(&field.key.as_str()) {
                continue;
            }
            object.insert(field.key.clone(), field.value.clone());
        }
        if let Some(error) = &self.error {
            object.insert(keys::ERROR.into(), Value::from(error.as_str()));
        }

        let mut line = serde_json::to_vec(&Value::Object(object))?;
        line.push(b'\n');
        Ok(line)
    }
}
