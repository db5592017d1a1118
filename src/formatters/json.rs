//! JSON object per line

use super::Formatter;
use crate::core::{LogEntry, Result};
use chrono::SecondsFormat;
use serde_json::{Map, Value};

/// Writes `{"level":..,"msg":..,"time":..}` plus caller keys and fields.
///
/// Fields named like one of the reserved keys are stored as `fields.<key>`.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pretty: bool,
}

const RESERVED: [&str; 6] = ["time", "level", "msg", "func", "file", "line"];

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Multi-line indented output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    fn to_value(entry: &LogEntry) -> Value {
        let mut object = Map::new();

        for (key, value) in entry.fields.iter() {
            let key = if RESERVED.contains(&key.as_str()) {
                format!("fields.{}", key)
            } else {
                key.clone()
            };
            object.insert(key, value.to_json_value());
        }

        object.insert(
            "time".to_string(),
            Value::String(entry.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        object.insert(
            "level".to_string(),
            Value::String(entry.level.to_string()),
        );
        object.insert("msg".to_string(), Value::String(entry.message.clone()));

        if let Some(ref caller) = entry.caller {
            object.insert("func".to_string(), Value::String(caller.function.clone()));
            if let Some(ref file) = caller.file {
                object.insert("file".to_string(), Value::String(file.clone()));
            }
            object.insert("line".to_string(), Value::Number(caller.line.into()));
        }

        Value::Object(object)
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        let value = Self::to_value(entry);
        let mut bytes = if self.pretty {
            serde_json::to_vec_pretty(&value)?
        } else {
            serde_json::to_vec(&value)?
        };
        bytes.push(b'\n');
        Ok(bytes)
    }
}
