//! # logvin
//!
//! A configuration-driven logging facade. A YAML file declares named
//! appenders (console, plain file, size-rotated file) and named loggers
//! (level, caller reporting, formatter, primary appender, secondary routes);
//! application code only ever asks for a logger by name.
//!
//! ## Features
//!
//! - **Declarative**: outputs and levels live in `./config/logger.yaml` or the
//!   file given with `-logger-config`
//! - **Graceful**: a missing or broken configuration falls back to a console
//!   logger at `info`; a missing appender falls back to stdout
//! - **Extensible**: formatters are registered by name
//! - **Thread Safe**: one logger instance per name, shared across threads
//!
//! ## Example
//!
//! ```
//! use logvin::{Config, LoggingContext};
//!
//! let context = LoggingContext::from_config(Config::default_config());
//! let log = context.logger("root");
//! log.info("hello world root");
//! ```

pub mod appenders;
pub mod config;
pub mod context;
pub mod core;
pub mod formatters;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, RotatingFileAppender};
    pub use crate::config::{Config, LoadMode};
    pub use crate::context::{ContextOptions, LoggingContext};
    pub use crate::core::{
        Appender, Caller, Diagnostics, FieldValue, Fields, Hook, LogEntry, LogLevel, Logger,
        LoggerBuilder, LoggerError, Result,
    };
    pub use crate::formatters::{CorvinFormatter, Formatter, JsonFormatter, TextFormatter};
}

pub use appenders::{ConsoleAppender, FileAppender, RotatingFileAppender};
pub use config::{Config, LoadMode};
pub use context::{global, logger, register_formatter, ContextOptions, LoggingContext};
pub use core::{
    concat_fragments, Appender, AppenderHook, Caller, Diagnostics, FieldValue, Fields, Hook,
    LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError, Result, SharedAppender,
};
pub use formatters::{Formatter, FormatterKind, FormatterRegistry};
