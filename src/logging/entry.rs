//! Log entries and their rendered form

use std::fmt;

use chrono::{DateTime, Local};
use serde_json::{Map, Value};

/// Timestamp layout used when rendering entries
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Info,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error | log::Level::Warn => LogLevel::Error,
            log::Level::Info | log::Level::Debug | log::Level::Trace => LogLevel::Info,
        }
    }
}

/// One log record, consumed once by the sink
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub fields: Map<String, Value>,
}

impl LogEntry {
    /// Build an entry stamped with the current local time.
    ///
    /// `fields` is normally a JSON object; `Value::Null` means no fields and any
    /// other value is kept under the `fields` key.
    pub fn new(level: LogLevel, message: String, fields: Value) -> Self {
        let fields = match fields {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("fields".to_string(), other);
                map
            }
        };

        Self {
            level,
            timestamp: Local::now(),
            message,
            fields,
        }
    }

    /// `[timestamp] [LEVEL] message key=value ...`
    pub fn render(&self) -> String {
        let mut line = format!(
            "[{}] [{}] {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.level,
            self.message
        );
        for (key, value) in &self.fields {
            line.push(' ');
            line.push_str(key);
            line.push('=');
            match value {
                Value::String(s) => line.push_str(s),
                other => line.push_str(&other.to_string()),
            }
        }
        line
    }
}
