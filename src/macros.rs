//! Logging macros.
//!
//! Every macro takes a logger followed by one or more fragments. Fragments are
//! any `Display` values; they are concatenated without separators, and the
//! call site (path of the enclosing function, `file!()`, `line!()`) is
//! attached as caller information for loggers that report it.
//!
//! # Examples
//!
//! ```
//! use logvin::prelude::*;
//! use logvin::info;
//!
//! let logger = Logger::builder("server").build();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port ", port);
//! ```

/// Log the concatenated fragments at an explicit level.
///
/// # Examples
///
/// ```
/// # use logvin::prelude::*;
/// # let logger = Logger::builder("root").build();
/// use logvin::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: ", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($fragment:expr),+ $(,)?) => {
        $logger.log_at(
            $level,
            $crate::concat_fragments(&[$(&$fragment as &dyn ::std::fmt::Display),+]),
            {
                fn __logvin_here() {}
                $crate::Caller::from_marker(__logvin_here, line!()).with_file(file!())
            },
        )
    };
}

/// Log at `Trace` level.
///
/// ```
/// # use logvin::prelude::*;
/// # let logger = Logger::builder("root").level(LogLevel::Trace).build();
/// use logvin::trace;
/// trace!(logger, "Entering function: calculate()");
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($fragment:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($fragment),+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($fragment:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($fragment),+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($fragment:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($fragment),+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($fragment:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($fragment),+)
    };
}

/// Log at `Error` level.
///
/// ```
/// # use logvin::prelude::*;
/// # let logger = Logger::builder("root").build();
/// use logvin::error;
/// error!(logger, "Error code: ", 500, ", message: ", "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($fragment:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($fragment),+)
    };
}

#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($fragment:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($fragment),+)
    };
}

/// Log at `Panic` level. The entry is written; the current thread keeps
/// running.
#[macro_export]
macro_rules! panic_log {
    ($logger:expr, $($fragment:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Panic, $($fragment),+)
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::FileAppender;
    use crate::core::appender::share;
    use crate::core::{Logger, LogLevel};
    use crate::formatters::CorvinFormatter;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn logger_into(path: &Path, level: LogLevel) -> Logger {
        Logger::builder("macros")
            .level(level)
            .report_caller(true)
            .formatter(Box::new(CorvinFormatter::new(true)))
            .output(share(Box::new(FileAppender::new("Macros", path).unwrap())))
            .build()
    }

    #[test]
    fn test_log_macro_concatenates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.log");
        let logger = logger_into(&path, LogLevel::Info);

        log!(logger, LogLevel::Info, "Formatted: ", 42, "/", 'x');

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("] Formatted: 42/x\r\n"));
    }

    #[test]
    fn test_macros_record_enclosing_function() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.log");
        let logger = logger_into(&path, LogLevel::Trace);

        trace!(logger, "t");
        debug!(logger, "d");
        info!(logger, "i");
        warn!(logger, "w");
        error!(logger, "e");
        fatal!(logger, "f");
        panic_log!(logger, "p",);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.split_terminator("\r\n").collect();
        assert_eq!(lines.len(), 7);
        for (line, level) in lines.iter().zip(["TRACE", "DEBUG", "INFO", "WARNING", "ERROR", "FATAL", "PANIC"]) {
            let caller = format!("[{}][logvin::macros::tests::test_macros_record_enclosing_function:", level);
            assert!(line.contains(&caller), "{}", line);
        }
    }

    #[test]
    fn test_macro_respects_level() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.log");
        let logger = logger_into(&path, LogLevel::Error);

        info!(logger, "hidden");
        error!(logger, "shown");

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("hidden"));
        assert!(content.contains("shown"));
    }
}
