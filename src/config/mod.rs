//! Declarative configuration: appenders and loggers
//!
//! The YAML document has the shape
//!
//! ```yaml
//! appenders:
//!   - name: Stdout
//!     output: console
//!   - name: App
//!     output: rotate:/var/log/app.log
//!     maxSize: 10
//!     maxAge: 7
//!     maxBackups: 3
//! loggers:
//!   root:
//!     name: root
//!     level: info
//!     formatter: TextFormatter
//!     appender: Stdout
//!   logger:
//!     - name: app
//!       level: debug
//!       caller: true
//!       formatter: CorvinFormatter
//!       appender: App
//! ```

pub mod loader;

pub use loader::{resolve_config_path, LoadMode, CONFIG_FLAG};

use crate::core::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Used when no `-logger-config` argument is given.
pub const DEFAULT_CONFIG_FILE: &str = "./config/logger.yaml";
pub const ROOT_LOGGER: &str = "root";
pub const STDOUT: &str = "Stdout";
pub const CONSOLE: &str = "Console";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub appenders: Vec<AppenderConfig>,
    pub loggers: LoggersConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppenderConfig {
    pub name: String,
    /// `console`, `stdout`, `file:/<path>` or `rotate:/<path>`
    pub output: String,
    /// Megabytes before a rotate appender rolls over
    #[serde(rename = "maxSize")]
    pub max_size: u64,
    /// Days a rotated backup is kept
    #[serde(rename = "maxAge")]
    pub max_age: u64,
    #[serde(rename = "maxBackups")]
    pub max_backups: usize,
    #[serde(rename = "localtime")]
    pub local_time: bool,
    pub compress: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggersConfig {
    pub root: LoggerConfig,
    pub logger: Vec<LoggerConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub name: String,
    pub level: String,
    /// Report the call site on every entry
    pub caller: bool,
    /// Colored level names in the text formatter
    pub console: bool,
    pub formatter: String,
    pub appender: String,
    /// Secondary routes; each becomes an appender hook
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub appenders: Vec<HookAppenderConfig>,
}

/// Secondary route: another appender, optionally with its own threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookAppenderConfig {
    pub name: String,
    /// Empty means "same level as the owning logger"
    pub level: String,
}

impl Config {
    /// Built-in configuration: one console appender and an INFO root logger.
    pub fn default_config() -> Self {
        Self {
            appenders: vec![AppenderConfig {
                name: STDOUT.to_string(),
                output: STDOUT.to_string(),
                ..AppenderConfig::default()
            }],
            loggers: LoggersConfig {
                root: LoggerConfig {
                    name: ROOT_LOGGER.to_string(),
                    level: crate::LogLevel::Info.to_string(),
                    caller: false,
                    console: true,
                    formatter: crate::formatters::TEXT_FORMATTER.to_string(),
                    appender: STDOUT.to_string(),
                    appenders: Vec::new(),
                },
                logger: Vec::new(),
            },
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// [`LoggerError::ConfigRead`] when the file cannot be read,
    /// [`LoggerError::ConfigParse`] when it is not a valid document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| LoggerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&data).map_err(|source| LoggerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Explicit entry for `name`, or the root config when there is none.
    pub fn logger_config(&self, name: &str) -> &LoggerConfig {
        self.loggers
            .logger
            .iter()
            .find(|lc| lc.name == name)
            .unwrap_or(&self.loggers.root)
    }

    pub fn appender_config(&self, name: &str) -> Option<&AppenderConfig> {
        self.appenders.iter().find(|ac| ac.name == name)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_yaml::to_string(self) {
            Ok(yaml) => f.write_str(&yaml),
            Err(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
appenders:
  - name: Stdout
    output: console
  - name: App
    output: rotate:/tmp/logvin/app.log
    maxSize: 10
    maxAge: 7
    maxBackups: 3
    localtime: true
    compress: true
loggers:
  root:
    name: root
    level: info
    formatter: TextFormatter
    appender: Stdout
  logger:
    - name: app
      level: debug
      caller: true
      formatter: CorvinFormatter
      appender: App
      appenders:
        - name: Stdout
          level: error
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_yaml_str(SAMPLE).unwrap();

        assert_eq!(config.appenders.len(), 2);
        let app = config.appender_config("App").unwrap();
        assert_eq!(app.output, "rotate:/tmp/logvin/app.log");
        assert_eq!(app.max_size, 10);
        assert_eq!(app.max_age, 7);
        assert_eq!(app.max_backups, 3);
        assert!(app.local_time);
        assert!(app.compress);

        let logger = config.logger_config("app");
        assert_eq!(logger.level, "debug");
        assert!(logger.caller);
        assert_eq!(logger.appenders[0].name, "Stdout");
        assert_eq!(logger.appenders[0].level, "error");
    }

    #[test]
    fn test_unknown_logger_inherits_root() {
        let config = Config::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.logger_config("ad-hoc"), &config.loggers.root);
    }

    #[test]
    fn test_missing_keys_default() {
        let config = Config::from_yaml_str("appenders:\n  - name: A\n    output: stdout\n").unwrap();
        assert_eq!(config.appenders[0].max_size, 0);
        assert!(config.loggers.logger.is_empty());
        assert_eq!(config.loggers.root, LoggerConfig::default());
    }

    #[test]
    fn test_default_config_shape() {
        let config = Config::default_config();
        assert_eq!(config.appenders.len(), 1);
        assert_eq!(config.appenders[0].name, "Stdout");
        assert_eq!(config.loggers.root.level, "info");
        assert!(!config.loggers.root.caller);
        assert!(config.loggers.root.console);
        assert_eq!(config.loggers.root.formatter, "TextFormatter");
        assert_eq!(config.loggers.root.appender, "Stdout");
    }

    #[test]
    fn test_display_is_yaml() {
        let rendered = Config::default_config().to_string();
        let reparsed = Config::from_yaml_str(&rendered).unwrap();
        assert_eq!(reparsed, Config::default_config());
        assert!(rendered.contains("maxSize"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/logvin/logger.yaml").unwrap_err();
        assert!(matches!(err, LoggerError::ConfigRead { .. }));
    }
}
