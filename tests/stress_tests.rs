//! Stress tests for concurrent use of a logging context
//!
//! These tests verify:
//! - Concurrent first requests for a name yield one logger instance
//! - The configuration is loaded exactly once under contention
//! - Concurrent writers never interleave partial lines
//! - Size rotation under concurrent load keeps every line

use logvin::config::LoadMode;
use logvin::{Config, ContextOptions, LogLevel, LoggingContext};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const MESSAGES_PER_THREAD: usize = 200;

fn file_config(dir: &Path, output_scheme: &str, extra: &str) -> String {
    let dir = dir.display().to_string();
    format!(
        "appenders:\n  - name: Out\n    output: {}{}/out.log\n{}loggers:\n  root:\n    name: root\n    level: trace\n    formatter: CorvinFormatter\n    appender: Out\n",
        output_scheme,
        dir.trim_start_matches('/'),
        extra
    )
}

#[test]
fn test_concurrent_logger_identity() {
    let context = Arc::new(LoggingContext::from_config(Config::default_config()));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let context = Arc::clone(&context);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                context.logger("shared")
            })
        })
        .collect();

    let loggers: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .collect();

    for logger in &loggers[1..] {
        assert!(Arc::ptr_eq(&loggers[0], logger));
    }
    let created = context
        .diagnostics()
        .messages()
        .iter()
        .filter(|m| m.as_str() == "New Logger: shared")
        .count();
    assert_eq!(created, 1);
}

#[test]
fn test_concurrent_lazy_load_happens_once() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("logger.yaml");
    fs::write(&path, file_config(temp_dir.path(), "file:/", "")).expect("Failed to write config");

    let context = Arc::new(LoggingContext::new(
        ContextOptions::new().config_path(&path).quiet(true),
    ));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let context = Arc::clone(&context);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                context.logger(&format!("worker-{}", i)).level()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("Thread panicked"), LogLevel::Trace);
    }

    let loads = context
        .diagnostics()
        .messages()
        .iter()
        .filter(|m| m.starts_with("logger config file:"))
        .count();
    assert_eq!(loads, 1);
    assert_eq!(context.logger_names().len(), THREADS);
}

#[test]
fn test_concurrent_writes_keep_lines_whole() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("logger.yaml");
    fs::write(&path, file_config(temp_dir.path(), "file:/", "")).expect("Failed to write config");

    let context = Arc::new(
        LoggingContext::init(
            ContextOptions::new()
                .config_path(&path)
                .mode(LoadMode::Strict)
                .quiet(true),
        )
        .expect("Config should load"),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = context.logger("root");
            thread::spawn(move || {
                for i in 0..MESSAGES_PER_THREAD {
                    logvin::info!(logger, "thread ", t, " message ", i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let content = fs::read_to_string(temp_dir.path().join("out.log")).expect("out.log");
    let lines: Vec<&str> = content.split_terminator("\r\n").collect();
    assert_eq!(lines.len(), THREADS * MESSAGES_PER_THREAD);
    assert!(lines.iter().all(|line| line.contains("[INFO] thread ")));
}

#[test]
fn test_rotation_under_load_keeps_every_line() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("logger.yaml");
    // maxSize is in megabytes; ~2 MB of output forces at least one rollover.
    fs::write(
        &path,
        file_config(temp_dir.path(), "rotate:/", "    maxSize: 1\n"),
    )
    .expect("Failed to write config");

    let context = Arc::new(LoggingContext::new(
        ContextOptions::new().config_path(&path).quiet(true),
    ));

    let padding = "x".repeat(200);
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = context.logger("root");
            let padding = padding.clone();
            thread::spawn(move || {
                for i in 0..2_000 {
                    logger.log_fragments(LogLevel::Info, [format!("t{} m{} ", t, i), padding.clone()]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    context.flush().expect("Failed to flush");

    let mut total = 0;
    let mut files = 0;
    for entry in fs::read_dir(temp_dir.path()).expect("read_dir") {
        let entry = entry.expect("dir entry");
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with("out") && name.ends_with(".log") {
            files += 1;
            let content = fs::read_to_string(entry.path()).expect("log file");
            total += content.split_terminator("\r\n").count();
        }
    }

    assert!(files > 1, "expected at least one rotation");
    assert_eq!(total, 4 * 2_000);
}
