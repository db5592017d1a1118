//! Appender implementations and the appender registry

pub mod console;
pub mod file;
pub mod rotating_file;

pub use console::ConsoleAppender;
pub use file::{FileAppender, FILE_PREFIX};
pub use rotating_file::{RotatingFileAppender, RotationPolicy, ROTATE_PREFIX};

pub use crate::core::{Appender, SharedAppender};

use crate::config::AppenderConfig;
use crate::core::appender::share;
use crate::core::{Diagnostics, LoggerError, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Construct the appender an entry describes.
///
/// # Errors
///
/// [`LoggerError::UndefinedAppender`] for an output target that is neither a
/// console spelling nor `file:/` / `rotate:/`; IO errors when a file cannot
/// be opened.
pub fn new_appender(config: &AppenderConfig) -> Result<Box<dyn Appender>> {
    if console::is_console_output(&config.output) {
        return Ok(Box::new(ConsoleAppender::new(config.name.clone())));
    }
    if config.output.starts_with(FILE_PREFIX) {
        let path = target_path(&config.output, FILE_PREFIX)?;
        return Ok(Box::new(FileAppender::new(config.name.clone(), path)?));
    }
    if config.output.starts_with(ROTATE_PREFIX) {
        return Ok(Box::new(RotatingFileAppender::from_config(config)?));
    }
    Err(LoggerError::undefined_appender(&config.name, &config.output))
}

/// Path named by a `file:/` or `rotate:/` target.
///
/// The slash after the scheme is the root of an absolute path
/// (`file:/var/log/app.log`) unless the remainder is explicitly relative
/// (`file:/./logs/app.log`, `file:/../app.log`) or carries a drive letter.
pub(crate) fn target_path(output: &str, prefix: &str) -> Result<PathBuf> {
    let rest = output
        .strip_prefix(prefix)
        .filter(|rest| !rest.is_empty())
        .ok_or_else(|| LoggerError::illegal_output(output))?;

    let relative = rest.starts_with("./") || rest.starts_with("../") || rest == "." || rest == "..";
    let has_drive = rest.as_bytes().get(1) == Some(&b':');
    if relative || has_drive {
        Ok(PathBuf::from(rest))
    } else {
        Ok(PathBuf::from(format!("/{}", rest)))
    }
}

/// Constructed appenders keyed by configured name.
///
/// Entries whose construction failed are absent; lookups for them return
/// `None` and callers fall back to [`AppenderRegistry::stdout`].
pub struct AppenderRegistry {
    appenders: HashMap<String, SharedAppender>,
    stdout: SharedAppender,
}

impl AppenderRegistry {
    pub fn new() -> Self {
        Self {
            appenders: HashMap::new(),
            stdout: share(Box::new(ConsoleAppender::default())),
        }
    }

    /// Build every configured appender, reporting and skipping failures.
    pub fn from_configs(configs: &[AppenderConfig], diagnostics: &Diagnostics) -> Self {
        let mut registry = Self::new();
        for config in configs {
            match new_appender(config) {
                Ok(appender) => {
                    diagnostics.report(format!(
                        "Appender[{}] output: {}",
                        config.name, config.output
                    ));
                    registry.insert(appender);
                }
                Err(e) => {
                    diagnostics.record_appender_failure();
                    diagnostics.report(format!("Appender[{}] not created: {}", config.name, e));
                }
            }
        }
        registry
    }

    /// Insert under the appender's own name, replacing any previous entry.
    pub fn insert(&mut self, appender: Box<dyn Appender>) -> SharedAppender {
        let name = appender.name().to_string();
        let shared = share(appender);
        self.appenders.insert(name, SharedAppender::clone(&shared));
        shared
    }

    pub fn get(&self, name: &str) -> Option<SharedAppender> {
        self.appenders.get(name).cloned()
    }

    /// Shared standard-output sink used as the fallback destination
    pub fn stdout(&self) -> SharedAppender {
        SharedAppender::clone(&self.stdout)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.appenders.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.appenders.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.appenders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appenders.is_empty()
    }

    pub fn flush_all(&self) -> Result<()> {
        for appender in self.appenders.values() {
            appender.lock().flush()?;
        }
        Ok(())
    }
}

impl Default for AppenderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
