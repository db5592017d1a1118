//! Error types for the logging facade

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Configuration file could not be read
    #[error("read file: {} error: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("unmarshal config {} error: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Output target that no appender kind understands
    #[error("un-defined appender: {name} (output: '{output}')")]
    UndefinedAppender { name: String, output: String },

    /// Output target with a known prefix but no usable path
    #[error("illegal file output: '{output}'")]
    IllegalOutput { output: String },

    /// Hook references an appender that was never constructed
    #[error("{name} logger un-found appender")]
    NoSuchAppender { name: String },

    /// Severity name that does not parse
    #[error("not a valid log level: '{0}'")]
    InvalidLevel(String),

    /// File appender error with path
    #[error("File appender error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an undefined appender error
    pub fn undefined_appender(name: impl Into<String>, output: impl Into<String>) -> Self {
        LoggerError::UndefinedAppender {
            name: name.into(),
            output: output.into(),
        }
    }

    pub fn illegal_output(output: impl Into<String>) -> Self {
        LoggerError::IllegalOutput {
            output: output.into(),
        }
    }

    pub fn no_such_appender(name: impl Into<String>) -> Self {
        LoggerError::NoSuchAppender { name: name.into() }
    }

    pub fn invalid_level(level: impl Into<String>) -> Self {
        LoggerError::InvalidLevel(level.into())
    }

    /// Create a file appender error
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }
}
