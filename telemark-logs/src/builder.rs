//! Builder for [`LogRecord`].

use std::time::{SystemTime, UNIX_EPOCH};

use hashbrown::HashMap;

use crate::record::{AnyValue, LogRecord, Severity};

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Assembles a [`LogRecord`] field by field.
///
/// Every field has a default; a record built with no setters carries the
/// current wall-clock time, undefined severity, and an empty string body.
#[derive(Debug, Clone)]
pub struct LogRecordBuilder {
    time_unix_nano: u64,
    trace_id: String,
    span_id: String,
    flags: u32,
    severity: Severity,
    severity_text: Option<String>,
    name: Option<String>,
    body: AnyValue,
    attributes: HashMap<String, AnyValue>,
}

impl Default for LogRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LogRecordBuilder {
    /// Create a builder with all fields at their defaults.
    pub fn new() -> Self {
        Self {
            time_unix_nano: 0,
            trace_id: String::new(),
            span_id: String::new(),
            flags: 0,
            severity: Severity::UndefinedSeverityNumber,
            severity_text: None,
            name: None,
            body: AnyValue::String(String::new()),
            attributes: HashMap::new(),
        }
    }

    /// Set the record timestamp, nanoseconds since the Unix epoch.
    pub fn time_unix_nano(mut self, timestamp: u64) -> Self {
        self.time_unix_nano = timestamp;
        self
    }

    /// Set the record timestamp, milliseconds since the Unix epoch.
    pub fn time_unix_millis(self, timestamp: u64) -> Self {
        self.time_unix_nano(timestamp * NANOS_PER_MILLI)
    }

    /// Set the correlated trace identifier.
    pub fn trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    /// Set the correlated span identifier.
    pub fn span_id(mut self, span_id: impl Into<String>) -> Self {
        self.span_id = span_id.into();
        self
    }

    /// Set the trace flags.
    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Set the severity.
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the source-native severity text.
    pub fn severity_text(mut self, severity_text: impl Into<String>) -> Self {
        self.severity_text = Some(severity_text.into());
        self
    }

    /// Set the short event name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the free-form body.
    pub fn body(mut self, body: impl Into<AnyValue>) -> Self {
        self.body = body.into();
        self
    }

    /// Attach one attribute, replacing any previous value for the key.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<AnyValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Attach a collection of attributes.
    pub fn attributes<K, V>(mut self, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<AnyValue>,
    {
        self.attributes
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Build the record.
    ///
    /// If no timestamp was set, the record is stamped with the current
    /// wall-clock time (millisecond precision, widened to nanoseconds).
    pub fn build(self) -> LogRecord {
        let time_unix_nano = if self.time_unix_nano == 0 {
            now_unix_millis() * NANOS_PER_MILLI
        } else {
            self.time_unix_nano
        };
        LogRecord {
            time_unix_nano,
            trace_id: self.trace_id,
            span_id: self.span_id,
            flags: self.flags,
            severity: self.severity,
            severity_text: self.severity_text,
            name: self.name,
            body: self.body,
            attributes: self.attributes,
        }
    }
}

fn now_unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
