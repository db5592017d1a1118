//! Log entry structure

use super::fields::{FieldValue, Fields};
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::panic::Location;

/// Call site that produced an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Function or module path of the call site
    pub function: String,
    pub file: Option<String>,
    pub line: u32,
}

impl Caller {
    pub fn new(function: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            file: None,
            line,
        }
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Caller for the function that defines the item `marker`.
    ///
    /// `marker` must be a function item named `__logvin_here` nested in the
    /// calling function; the logging macros expand to exactly that. Its type
    /// name is the full path of the enclosing function.
    #[doc(hidden)]
    pub fn from_marker<F>(_marker: F, line: u32) -> Self {
        let path = std::any::type_name::<F>();
        let function = path.strip_suffix("::__logvin_here").unwrap_or(path);
        Self::new(function, line)
    }

    /// Caller taken from a `#[track_caller]` location; Rust does not expose the
    /// enclosing function name there, so the source file stands in for it.
    pub fn from_location(location: &Location<'_>) -> Self {
        Self {
            function: location.file().to_string(),
            file: Some(location.file().to_string()),
            line: location.line(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub caller: Option<Caller>,
    #[serde(skip_serializing_if = "Fields::is_empty", default)]
    pub fields: Fields,
}

impl LogEntry {
    /// Entry stamped with the current local time; the message is kept verbatim.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
            caller: None,
            fields: Fields::new(),
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key, value);
        self
    }
}
