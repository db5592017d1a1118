//! Core logger types and traits

pub mod appender;
pub mod diagnostics;
pub mod error;
pub mod fields;
pub mod hook;
pub mod log_entry;
pub mod log_level;
pub mod logger;

pub use appender::{Appender, SharedAppender};
pub use diagnostics::Diagnostics;
pub use error::{LoggerError, Result};
pub use fields::{FieldValue, Fields};
pub use hook::{AppenderHook, Hook};
pub use log_entry::{Caller, LogEntry};
pub use log_level::LogLevel;
pub use logger::{concat_fragments, Logger, LoggerBuilder};
