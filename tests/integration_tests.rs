//! Integration tests for the logging facade
//!
//! These tests verify:
//! - Configuration loading from YAML, including the fallback default
//! - Logger identity and root inheritance
//! - Appender construction and stdout fallback
//! - Formatter registration semantics
//! - Secondary routes (hooks)
//! - Messages reach every formatter unchanged

use logvin::config::{LoadMode, STDOUT};
use logvin::formatters::{Formatter, CORVIN_FORMATTER};
use logvin::{Config, ContextOptions, LogEntry, LogLevel, LoggingContext, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const FIXTURE: &str = include_str!("fixtures/logger_test.yaml");

/// Fixture with `{dir}` replaced by a scratch directory.
fn fixture_in(dir: &Path) -> Config {
    let dir = dir.display().to_string();
    let yaml = FIXTURE.replace("{dir}", dir.trim_start_matches('/'));
    Config::from_yaml_str(&yaml).expect("Fixture should parse")
}

struct Tagged;

impl Formatter for Tagged {
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        Ok(format!("tagged {}\n", entry.message).into_bytes())
    }
}

#[test]
fn test_fixture_parses() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = fixture_in(temp_dir.path());

    assert_eq!(config.appenders.len(), 5);
    let rotate = config.appender_config("Rotate").expect("Rotate appender");
    assert_eq!(rotate.max_size, 10);
    assert_eq!(rotate.max_age, 7);
    assert_eq!(rotate.max_backups, 3);
    assert!(rotate.local_time);
    assert!(!rotate.compress);

    assert_eq!(config.loggers.root.level, "info");
    assert_eq!(config.logger_config("service").formatter, CORVIN_FORMATTER);
    assert_eq!(config.logger_config("service").appenders.len(), 1);
}

#[test]
fn test_absent_config_yields_default() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let options = ContextOptions::new()
        .config_path(temp_dir.path().join("missing.yaml"))
        .quiet(true);
    let context = LoggingContext::new(options);

    let config = context.config();
    assert_eq!(config.appenders.len(), 1);
    assert_eq!(config.appenders[0].name, STDOUT);
    assert!(config.appenders[0].output.eq_ignore_ascii_case("stdout"));
    assert_eq!(config.loggers.root.name, "root");
    assert_eq!(config.loggers.root.level.parse::<LogLevel>().ok(), Some(LogLevel::Info));
    assert!(context.diagnostics().contains("using default config"));
}

#[test]
fn test_malformed_config_yields_default() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("broken.yaml");
    fs::write(&path, "appenders: [unclosed\nloggers: {").expect("Failed to write config");

    let lenient = LoggingContext::new(ContextOptions::new().config_path(&path).quiet(true));
    assert_eq!(*lenient.config(), Config::default_config());

    let strict = LoggingContext::init(
        ContextOptions::new()
            .config_path(&path)
            .mode(LoadMode::Strict)
            .quiet(true),
    );
    assert!(strict.is_err());
}

#[test]
fn test_logger_identity() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let context = LoggingContext::from_config(fixture_in(temp_dir.path()));

    let a = context.logger("service");
    let b = context.logger("service");
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_unknown_name_inherits_root() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = fixture_in(temp_dir.path());
    let root = config.loggers.root.clone();
    let context = LoggingContext::from_config(config);

    let adhoc = context.logger("adhoc.component");
    assert_eq!(*adhoc.config(), root);
    assert_eq!(adhoc.level(), LogLevel::Info);
    assert!(!adhoc.reports_caller());
    assert_eq!(adhoc.output_name(), root.appender);
}

#[test]
fn test_rotate_target_receives_writes() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let context = LoggingContext::from_config(fixture_in(temp_dir.path()));

    let rotating = context.logger("rotating");
    rotating.info("hello rotate");
    rotating.flush().expect("Failed to flush");

    let content = fs::read_to_string(temp_dir.path().join("rotate.log"))
        .expect("Failed to read rotate target");
    assert!(content.contains("hello rotate"));
}

#[test]
fn test_service_logger_routes_errors_to_audit() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let context = LoggingContext::from_config(fixture_in(temp_dir.path()));

    let service = context.logger("service");
    service.debug("cache warmed");
    service.warn("slow request");
    service.error("upstream failed");
    context.flush().expect("Failed to flush");

    let app = fs::read_to_string(temp_dir.path().join("app.log")).expect("app.log");
    let audit = fs::read_to_string(temp_dir.path().join("audit.log")).expect("audit.log");

    assert!(app.contains("[DEBUG]"));
    assert!(app.contains("[WARNING]"));
    assert!(app.contains("[ERROR]"));
    assert!(app.contains("integration_tests.rs:"), "caller expected in {:?}", app);
    assert!(!audit.contains("cache warmed"));
    assert!(!audit.contains("slow request"));
    assert!(audit.contains("upstream failed"));
}

#[test]
fn test_registered_formatter_is_not_retroactive() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let context = LoggingContext::from_config(fixture_in(temp_dir.path()));

    let before = context.logger("service");
    assert!(context.register_formatter(CORVIN_FORMATTER, |_| Box::new(Tagged) as Box<dyn Formatter>));
    let after = context.logger("worker");

    before.info("from before");
    after.info("from after");

    let app = fs::read_to_string(temp_dir.path().join("app.log")).expect("app.log");
    assert!(app.contains("[INFO]"));
    assert!(!app.contains("tagged from before"));
    assert!(app.contains("tagged from after\n"));
}

#[test]
fn test_unresolved_appender_falls_back_to_stdout() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let context = LoggingContext::from_config(fixture_in(temp_dir.path()));

    let orphan = context.logger("orphan");
    assert_eq!(orphan.output_name(), STDOUT);
    assert!(context
        .diagnostics()
        .contains("orphan logger un-found appender Nowhere"));
    assert_eq!(context.diagnostics().appender_fallbacks(), 1);
}

#[test]
fn test_control_characters_written_verbatim() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let context = LoggingContext::from_config(fixture_in(temp_dir.path()));
    let service = context.logger("service");

    service.log_fragments(LogLevel::Info, ["col1\tcol2", "\nline2"]);

    let content = fs::read_to_string(temp_dir.path().join("app.log")).expect("app.log");
    assert!(
        content.ends_with("] col1\tcol2\nline2\r\n"),
        "message altered: {:?}",
        content
    );
}

#[test]
fn test_json_round_trips_tabs_and_newlines() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let context = LoggingContext::from_config(fixture_in(temp_dir.path()));
    let json = context.logger("json");

    json.info("a\tb");
    json.info("first\nsecond");

    let content = fs::read_to_string(temp_dir.path().join("json.log")).expect("json.log");
    let messages: Vec<String> = content
        .lines()
        .map(|line| {
            let parsed: serde_json::Value = serde_json::from_str(line).expect("JSON line");
            parsed["msg"].as_str().expect("msg").to_string()
        })
        .collect();
    assert_eq!(messages, vec!["a\tb", "first\nsecond"]);
}

#[test]
fn test_fields_in_json_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let context = LoggingContext::from_config(fixture_in(temp_dir.path()));
    let json = context.logger("json");

    json.log_with_fields(
        LogLevel::Info,
        "Request completed",
        logvin::Fields::new().with_field("status", 200).with_field("path", "/health"),
    );

    let content = fs::read_to_string(temp_dir.path().join("json.log")).expect("json.log");
    let parsed: serde_json::Value =
        serde_json::from_str(content.trim_end()).expect("One JSON object per line");
    assert_eq!(parsed["msg"], "Request completed");
    assert_eq!(parsed["level"], "info");
    assert_eq!(parsed["status"], 200);
    assert_eq!(parsed["path"], "/health");
}
