//! Line formatters and the formatter registry
//!
//! Built-in formats form a closed set ([`FormatterKind`]); host applications
//! add their own by registering a factory under a name in a
//! [`FormatterRegistry`]. Loggers resolve their formatter by name once, when
//! they are built.

pub mod corvin;
pub mod json;
pub mod text;

pub use corvin::CorvinFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::config::LoggerConfig;
use crate::core::{LogEntry, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const TEXT_FORMATTER: &str = "TextFormatter";
pub const JSON_FORMATTER: &str = "JSONFormatter";
pub const CORVIN_FORMATTER: &str = "CorvinFormatter";

/// Renders one entry into the exact bytes written to an appender.
pub trait Formatter: Send + Sync {
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>>;
}

/// Builds a formatter for the logger configuration it will serve.
pub type FormatterFactory = Arc<dyn Fn(&LoggerConfig) -> Box<dyn Formatter> + Send + Sync>;

/// Built-in formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatterKind {
    /// `key=value` text lines
    Text,
    /// One JSON object per line
    Json,
    /// `<timestamp>[<LEVEL>][<func>:<line>] <message>` CR-LF lines
    Corvin,
}

impl FormatterKind {
    pub const ALL: [FormatterKind; 3] = [
        FormatterKind::Text,
        FormatterKind::Json,
        FormatterKind::Corvin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FormatterKind::Text => TEXT_FORMATTER,
            FormatterKind::Json => JSON_FORMATTER,
            FormatterKind::Corvin => CORVIN_FORMATTER,
        }
    }

    pub fn build(&self, config: &LoggerConfig) -> Box<dyn Formatter> {
        match self {
            FormatterKind::Text => Box::new(TextFormatter::from_config(config)),
            FormatterKind::Json => Box::new(JsonFormatter::new()),
            FormatterKind::Corvin => Box::new(CorvinFormatter::from_config(config)),
        }
    }

    pub fn factory(self) -> FormatterFactory {
        Arc::new(move |config: &LoggerConfig| self.build(config))
    }
}

impl fmt::Display for FormatterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormatterKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("Unknown formatter: '{}'", s))
    }
}

/// Name to factory mapping; entries are added or replaced, never removed.
pub struct FormatterRegistry {
    factories: RwLock<HashMap<String, FormatterFactory>>,
}

impl FormatterRegistry {
    /// Registry holding the built-in formats
    pub fn new() -> Self {
        let factories = FormatterKind::ALL
            .iter()
            .map(|kind| (kind.name().to_string(), kind.factory()))
            .collect();
        Self {
            factories: RwLock::new(factories),
        }
    }

    /// Register `factory` under `name`, replacing any previous entry.
    ///
    /// Loggers built before the call keep the formatter they already have.
    ///
    /// ```
    /// use logvin::formatters::{FormatterRegistry, JsonFormatter, Formatter};
    ///
    /// let registry = FormatterRegistry::new();
    /// assert!(registry.register("Audit", |_| Box::new(JsonFormatter::new()) as Box<dyn Formatter>));
    /// assert!(registry.lookup("Audit").is_some());
    /// ```
    pub fn register<F>(&self, name: impl Into<String>, factory: F) -> bool
    where
        F: Fn(&LoggerConfig) -> Box<dyn Formatter> + Send + Sync + 'static,
    {
        self.factories.write().insert(name.into(), Arc::new(factory));
        true
    }

    pub fn lookup(&self, name: &str) -> Option<FormatterFactory> {
        self.factories.read().get(name).cloned()
    }

    /// Formatter for `config.formatter`, if one is registered under that name
    pub fn build(&self, config: &LoggerConfig) -> Option<Box<dyn Formatter>> {
        if config.formatter.is_empty() {
            return None;
        }
        self.lookup(&config.formatter).map(|factory| factory(config))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
