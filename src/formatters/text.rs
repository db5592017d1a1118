//! Key-value text format
//!
//! Example: `time="2025-01-08T10:30:45+01:00" level=info msg="Request processed" user=alice`
//!
//! With console colors enabled the level leads the line instead:
//! `INFO[2025-01-08T10:30:45+01:00] Request processed user=alice`

use super::Formatter;
use crate::config::LoggerConfig;
use crate::core::{FieldValue, LogEntry, Result};
use chrono::SecondsFormat;

#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    /// ANSI-colored level names. A `LoggingContext` only turns these on for
    /// loggers whose every route writes to stdout.
    pub colors: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &LoggerConfig) -> Self {
        Self {
            colors: config.console,
        }
    }

    fn timestamp(entry: &LogEntry) -> String {
        entry.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    fn format_plain(&self, entry: &LogEntry) -> String {
        let mut parts = vec![
            format!("time={}", quote_if_needed(&Self::timestamp(entry))),
            format!("level={}", entry.level),
            format!("msg={}", quote_if_needed(&entry.message)),
        ];
        parts.extend(field_parts(entry));
        parts.extend(caller_parts(entry));
        parts.join(" ")
    }

    #[cfg(feature = "console")]
    fn format_colored(&self, entry: &LogEntry) -> String {
        use colored::Colorize;

        let level = entry.level.to_upper().color(entry.level.color_code());
        let mut line = format!("{}[{}] {}", level, Self::timestamp(entry), entry.message);
        for part in field_parts(entry).into_iter().chain(caller_parts(entry)) {
            line.push(' ');
            line.push_str(&part);
        }
        line
    }

    #[cfg(not(feature = "console"))]
    fn format_colored(&self, entry: &LogEntry) -> String {
        self.format_plain(entry)
    }
}

impl Formatter for TextFormatter {
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        let mut line = if self.colors {
            self.format_colored(entry)
        } else {
            self.format_plain(entry)
        };
        line.push('\n');
        Ok(line.into_bytes())
    }
}

fn field_parts(entry: &LogEntry) -> Vec<String> {
    entry
        .fields
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                FieldValue::String(s) => quote_if_needed(s),
                other => other.to_string(),
            };
            format!("{}={}", escape_key(key), rendered)
        })
        .collect()
}

fn caller_parts(entry: &LogEntry) -> Vec<String> {
    match entry.caller {
        Some(ref caller) => {
            let mut parts = vec![format!("func={}", quote_if_needed(&caller.function))];
            if let Some(ref file) = caller.file {
                parts.push(format!(
                    "file={}",
                    quote_if_needed(&format!("{}:{}", file, caller.line))
                ));
            } else {
                parts.push(format!("line={}", caller.line));
            }
            parts
        }
        None => Vec::new(),
    }
}

/// Keep only characters that are safe in a bare key
fn escape_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
        .collect()
}

fn quote_if_needed(value: &str) -> String {
    if value.is_empty() || value.contains(&[' ', '"', '='][..]) {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}
