//! Fixed human-readable line format
//!
//! ```text
//! 2024-01-02 03:04:05.006[ERROR] boom
//! 2024-01-02 03:04:05.006[ERROR][pkg.Fn:42] boom
//! ```
//!
//! Lines end with CR-LF.

use super::Formatter;
use crate::config::LoggerConfig;
use crate::core::{LogEntry, Result};

const TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, Default)]
pub struct CorvinFormatter {
    /// Render the call site when the entry carries one
    pub caller: bool,
}

impl CorvinFormatter {
    pub fn new(caller: bool) -> Self {
        Self { caller }
    }

    pub fn from_config(config: &LoggerConfig) -> Self {
        Self::new(config.caller)
    }
}

impl Formatter for CorvinFormatter {
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        let timestamp = entry.timestamp.format(TIME_LAYOUT);
        let level = entry.level.to_upper();

        let line = match entry.caller {
            Some(ref caller) if self.caller => format!(
                "{}[{}][{}:{}] {}\r\n",
                timestamp, level, caller.function, caller.line, entry.message
            ),
            _ => format!("{}[{}] {}\r\n", timestamp, level, entry.message),
        };
        Ok(line.into_bytes())
    }
}
