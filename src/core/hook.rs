//! Hooks: extra destinations for entries at selected levels

use super::appender::SharedAppender;
use super::error::{LoggerError, Result};
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use crate::appenders::AppenderRegistry;
use crate::config::{HookAppenderConfig, LoggerConfig};

/// Called by a logger for every entry whose level is in [`Hook::levels`],
/// after the entry has been written to the logger's own output.
pub trait Hook: Send + Sync {
    fn levels(&self) -> &[LogLevel];

    /// `line` is the entry as rendered by the owning logger's formatter.
    fn fire(&self, entry: &LogEntry, line: &[u8]) -> Result<()>;
}

/// Copies formatted lines to a second appender.
pub struct AppenderHook {
    appender: SharedAppender,
    levels: Vec<LogLevel>,
}

impl AppenderHook {
    pub fn new(appender: SharedAppender, levels: Vec<LogLevel>) -> Self {
        Self { appender, levels }
    }

    /// Route for `hook` on a logger configured by `logger`.
    ///
    /// The threshold is the hook's own level, or the logger's when the hook
    /// leaves it empty; the hook fires for every level at or above it. An
    /// unparsable threshold yields a hook that never fires.
    ///
    /// # Errors
    ///
    /// [`LoggerError::NoSuchAppender`] when `hook.name` is not in `appenders`.
    pub fn from_config(
        logger: &LoggerConfig,
        hook: &HookAppenderConfig,
        appenders: &AppenderRegistry,
    ) -> Result<Self> {
        let threshold = if hook.level.is_empty() {
            &logger.level
        } else {
            &hook.level
        };
        let levels = threshold
            .parse::<LogLevel>()
            .map(|level| level.at_or_above())
            .unwrap_or_default();

        let appender = appenders
            .get(&hook.name)
            .ok_or_else(|| LoggerError::no_such_appender(&hook.name))?;
        Ok(Self::new(appender, levels))
    }

    pub fn appender_name(&self) -> String {
        self.appender.lock().name().to_string()
    }
}

impl Hook for AppenderHook {
    fn levels(&self) -> &[LogLevel] {
        &self.levels
    }

    fn fire(&self, _entry: &LogEntry, line: &[u8]) -> Result<()> {
        self.appender.lock().write(line)
    }
}
