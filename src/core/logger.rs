//! Logger handle
//!
//! A `Logger` is fully configured when it is built: level, caller reporting,
//! formatter and output never change afterwards. Emitting formats the entry
//! once, writes it to the output, then hands the same bytes to every hook
//! registered for the entry's level.

use super::{
    appender::{share, SharedAppender},
    diagnostics::Diagnostics,
    fields::Fields,
    hook::Hook,
    log_entry::{Caller, LogEntry},
    log_level::LogLevel,
};
use crate::appenders::ConsoleAppender;
use crate::config::LoggerConfig;
use crate::formatters::{Formatter, TextFormatter};
use parking_lot::RwLock;
use std::fmt::{self, Display, Write as _};
use std::panic::Location;
use std::sync::Arc;

pub struct Logger {
    name: String,
    config: LoggerConfig,
    level: LogLevel,
    report_caller: bool,
    formatter: Box<dyn Formatter>,
    output: SharedAppender,
    hooks: RwLock<Vec<Box<dyn Hook>>>,
    diagnostics: Arc<Diagnostics>,
}

/// Builder for [`Logger`]
///
/// Defaults: `Info` level, no caller reporting, [`TextFormatter`], a private
/// console output.
///
/// # Example
///
/// ```
/// use logvin::{Logger, LogLevel};
/// use logvin::formatters::CorvinFormatter;
///
/// let logger = Logger::builder("worker")
///     .level(LogLevel::Debug)
///     .report_caller(true)
///     .formatter(Box::new(CorvinFormatter::new(true)))
///     .build();
///
/// assert!(logger.is_enabled(LogLevel::Debug));
/// logger.debug("worker started");
/// ```
pub struct LoggerBuilder {
    name: String,
    config: LoggerConfig,
    level: LogLevel,
    report_caller: bool,
    formatter: Option<Box<dyn Formatter>>,
    output: Option<SharedAppender>,
    diagnostics: Option<Arc<Diagnostics>>,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: LoggerConfig::default(),
            level: LogLevel::default(),
            report_caller: false,
            formatter: None,
            output: None,
            diagnostics: None,
        }
    }

    /// Configuration the logger was resolved from
    #[must_use]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn report_caller(mut self, enabled: bool) -> Self {
        self.report_caller = enabled;
        self
    }

    #[must_use]
    pub fn formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    #[must_use]
    pub fn output(mut self, output: SharedAppender) -> Self {
        self.output = Some(output);
        self
    }

    #[must_use]
    pub fn diagnostics(mut self, diagnostics: Arc<Diagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            name: self.name,
            config: self.config,
            level: self.level,
            report_caller: self.report_caller,
            formatter: self
                .formatter
                .unwrap_or_else(|| Box::new(TextFormatter::new())),
            output: self
                .output
                .unwrap_or_else(|| share(Box::new(ConsoleAppender::default()))),
            hooks: RwLock::new(Vec::new()),
            diagnostics: self
                .diagnostics
                .unwrap_or_else(|| Arc::new(Diagnostics::new())),
        }
    }
}

impl Logger {
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }

    /// Name this logger was requested under
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    pub fn reports_caller(&self) -> bool {
        self.report_caller
    }

    pub fn output(&self) -> &SharedAppender {
        &self.output
    }

    pub fn output_name(&self) -> String {
        self.output.lock().name().to_string()
    }

    pub fn add_hook(&self, hook: Box<dyn Hook>) {
        self.hooks.write().push(hook);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.read().len()
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let location = Location::caller();
        self.dispatch(level, || message.into(), Fields::new(), || {
            Caller::from_location(location)
        });
    }

    /// Log the concatenation of `fragments`.
    ///
    /// ```
    /// # use logvin::{Logger, LogLevel};
    /// # let logger = Logger::builder("root").build();
    /// logger.log_fragments(LogLevel::Info, ["hello world", " ", "root"]);
    /// logger.log_fragments(LogLevel::Info, [&"retry " as &dyn std::fmt::Display, &3]);
    /// ```
    #[track_caller]
    pub fn log_fragments<I>(&self, level: LogLevel, fragments: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let location = Location::caller();
        self.dispatch(
            level,
            || {
                let mut message = String::new();
                for fragment in fragments {
                    let _ = write!(message, "{}", fragment);
                }
                message
            },
            Fields::new(),
            || Caller::from_location(location),
        );
    }

    /// Log with structured fields
    #[track_caller]
    pub fn log_with_fields(&self, level: LogLevel, message: impl Into<String>, fields: Fields) {
        let location = Location::caller();
        self.dispatch(level, || message.into(), fields, || {
            Caller::from_location(location)
        });
    }

    /// Log with an explicit call site; used by the logging macros.
    pub fn log_at(&self, level: LogLevel, message: impl Into<String>, caller: Caller) {
        self.dispatch(level, || message.into(), Fields::new(), || caller);
    }

    fn dispatch(
        &self,
        level: LogLevel,
        message: impl FnOnce() -> String,
        fields: Fields,
        caller: impl FnOnce() -> Caller,
    ) {
        if !self.is_enabled(level) {
            return;
        }

        let mut entry = LogEntry::new(level, message()).with_fields(fields);
        if self.report_caller {
            entry = entry.with_caller(caller());
        }

        let line = match self.formatter.format(&entry) {
            Ok(line) => line,
            Err(e) => {
                self.diagnostics
                    .report(format!("{} logger failed to format entry: {}", self.name, e));
                return;
            }
        };

        if let Err(e) = self.output.lock().write(&line) {
            self.diagnostics
                .report(format!("{} logger failed to write entry: {}", self.name, e));
        }

        for hook in self.hooks.read().iter() {
            if !hook.levels().contains(&level) {
                continue;
            }
            if let Err(e) = hook.fire(&entry, &line) {
                self.diagnostics
                    .report(format!("{} logger hook failed: {}", self.name, e));
            }
        }
    }

    pub fn flush(&self) -> super::error::Result<()> {
        self.output.lock().flush()
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    /// Logs at `Panic` level; does not unwind.
    #[inline]
    #[track_caller]
    pub fn panic(&self, message: impl Into<String>) {
        self.log(LogLevel::Panic, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("report_caller", &self.report_caller)
            .field("config", &self.config)
            .field("hooks", &self.hook_count())
            .finish()
    }
}

/// Concatenate fragments the way the logging macros do.
pub fn concat_fragments(fragments: &[&dyn Display]) -> String {
    let mut message = String::new();
    for fragment in fragments {
        let _ = write!(message, "{}", fragment);
    }
    message
}
