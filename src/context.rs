//! Logging context: configuration, appenders, formatters and loggers
//!
//! A [`LoggingContext`] owns everything a set of loggers shares. The
//! configuration is loaded at most once per context; loggers are created on
//! first request and the same instance is handed out for a name afterwards.
//!
//! Most applications use the process-wide context behind [`global`], which
//! picks its configuration file from the `-logger-config` command line flag.

use crate::appenders::console::is_console_output;
use crate::appenders::AppenderRegistry;
use crate::config::{self, Config, HookAppenderConfig, LoadMode, LoggerConfig};
use crate::core::{AppenderHook, Diagnostics, LogLevel, Logger, Result};
use crate::formatters::{Formatter, FormatterRegistry};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

/// How a [`LoggingContext`] finds and loads its configuration.
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    /// `None` means [`config::DEFAULT_CONFIG_FILE`]
    pub config_path: Option<PathBuf>,
    pub mode: LoadMode,
    /// Keep diagnostics in memory instead of echoing them to stderr
    pub quiet: bool,
}

impl ContextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options taking the configuration path from command line arguments
    /// (program name excluded).
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new().config_path(config::resolve_config_path(args))
    }

    #[must_use]
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn path(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_FILE))
    }
}

enum ConfigSource {
    File(PathBuf),
    Memory(Config),
}

struct LoadedState {
    config: Config,
    appenders: AppenderRegistry,
}

/// # Example
///
/// ```
/// use logvin::{Config, LoggingContext};
///
/// let context = LoggingContext::from_config(Config::default_config());
/// let root = context.logger("root");
/// let other = context.logger("anything-else");
///
/// root.info("hello world root");
/// assert_eq!(other.config().name, "root");
/// assert!(std::sync::Arc::ptr_eq(&root, &context.logger("root")));
/// ```
pub struct LoggingContext {
    source: ConfigSource,
    mode: LoadMode,
    state: OnceLock<LoadedState>,
    formatters: FormatterRegistry,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
    diagnostics: Arc<Diagnostics>,
}

impl LoggingContext {
    /// Context that loads its configuration on first use.
    ///
    /// Load failures never surface here: they are reported and the built-in
    /// default is used. A [`LoadMode::Strict`] request is reported and
    /// downgraded. Use [`LoggingContext::init`] to observe load errors.
    pub fn new(options: ContextOptions) -> Self {
        let diagnostics = Self::diagnostics_for(&options);
        if options.mode == LoadMode::Strict {
            diagnostics.report("strict load mode needs LoggingContext::init; loading leniently");
        }
        Self {
            source: ConfigSource::File(options.path()),
            mode: LoadMode::Lenient,
            state: OnceLock::new(),
            formatters: FormatterRegistry::new(),
            loggers: Mutex::new(HashMap::new()),
            diagnostics: Arc::new(diagnostics),
        }
    }

    /// Context with its configuration loaded immediately.
    ///
    /// # Errors
    ///
    /// In [`LoadMode::Strict`], the read or parse error of the configuration
    /// file. Lenient mode always succeeds.
    pub fn init(options: ContextOptions) -> Result<Self> {
        let path = options.path();
        let context = Self {
            source: ConfigSource::File(path.clone()),
            mode: options.mode,
            state: OnceLock::new(),
            formatters: FormatterRegistry::new(),
            loggers: Mutex::new(HashMap::new()),
            diagnostics: Arc::new(Self::diagnostics_for(&options)),
        };

        let config = config::loader::load(&path, context.mode, &context.diagnostics)?;
        let _ = context.state.set(context.build_state(config));
        Ok(context)
    }

    /// Context over an in-memory configuration; diagnostics stay in memory.
    pub fn from_config(config: Config) -> Self {
        Self {
            source: ConfigSource::Memory(config),
            mode: LoadMode::Lenient,
            state: OnceLock::new(),
            formatters: FormatterRegistry::new(),
            loggers: Mutex::new(HashMap::new()),
            diagnostics: Arc::new(Diagnostics::quiet()),
        }
    }

    fn diagnostics_for(options: &ContextOptions) -> Diagnostics {
        if options.quiet {
            Diagnostics::quiet()
        } else {
            Diagnostics::new()
        }
    }

    fn build_state(&self, config: Config) -> LoadedState {
        let appenders = AppenderRegistry::from_configs(&config.appenders, &self.diagnostics);
        LoadedState { config, appenders }
    }

    fn state(&self) -> &LoadedState {
        self.state.get_or_init(|| {
            let config = match self.source {
                ConfigSource::File(ref path) => {
                    match config::loader::load(path, LoadMode::Lenient, &self.diagnostics) {
                        Ok(config) => config,
                        Err(e) => {
                            self.diagnostics.report(format!("{}; using default config", e));
                            Config::default_config()
                        }
                    }
                }
                ConfigSource::Memory(ref config) => config.clone(),
            };
            self.build_state(config)
        })
    }

    /// The loaded configuration, loading it if this is the first use.
    pub fn config(&self) -> &Config {
        &self.state().config
    }

    pub fn appenders(&self) -> &AppenderRegistry {
        &self.state().appenders
    }

    pub fn formatters(&self) -> &FormatterRegistry {
        &self.formatters
    }

    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    /// Register a formatter factory under `name`, replacing any previous one.
    ///
    /// Only loggers created after the call see the new factory.
    pub fn register_formatter<F>(&self, name: impl Into<String>, factory: F) -> bool
    where
        F: Fn(&LoggerConfig) -> Box<dyn Formatter> + Send + Sync + 'static,
    {
        let name = name.into();
        self.diagnostics.report(format!("register formatter: {}", name));
        self.formatters.register(name, factory)
    }

    /// The logger for `name`, created on first request.
    ///
    /// Names without their own entry use the root configuration. The
    /// registry lock is held from lookup to insertion, so concurrent first
    /// requests for one name yield a single instance.
    pub fn logger(&self, name: &str) -> Arc<Logger> {
        let mut loggers = self.loggers.lock();
        if let Some(logger) = loggers.get(name) {
            return Arc::clone(logger);
        }

        let logger = Arc::new(self.build_logger(name));
        loggers.insert(name.to_string(), Arc::clone(&logger));
        self.diagnostics.report(format!("New Logger: {}", name));
        logger
    }

    fn build_logger(&self, name: &str) -> Logger {
        let state = self.state();
        let config = state.config.logger_config(name).clone();

        let mut builder = Logger::builder(name)
            .report_caller(config.caller)
            .diagnostics(Arc::clone(&self.diagnostics));

        if !config.level.is_empty() {
            match config.level.parse::<LogLevel>() {
                Ok(level) => builder = builder.level(level),
                Err(e) => self
                    .diagnostics
                    .report(format!("{} logger keeps default level: {}", config.name, e)),
            }
        }

        let formatter = if config.console && !Self::console_only(state, &config) {
            let plain = LoggerConfig {
                console: false,
                ..config.clone()
            };
            self.formatters.build(&plain)
        } else {
            self.formatters.build(&config)
        };
        if let Some(formatter) = formatter {
            builder = builder.formatter(formatter);
        }

        let output = match state.appenders.get(&config.appender) {
            Some(appender) => appender,
            None => {
                self.diagnostics.record_appender_fallback();
                self.diagnostics.report(format!(
                    "{} logger un-found appender {}",
                    config.name, config.appender
                ));
                state.appenders.stdout()
            }
        };
        builder = builder.output(output);

        let hooks = config.appenders.clone();
        let logger = builder.config(config).build();
        for hook in &hooks {
            match self.new_hook(logger.config(), hook) {
                Ok(hook) => logger.add_hook(Box::new(hook)),
                Err(e) => {
                    self.diagnostics.record_hook_failure();
                    self.diagnostics.report(e.to_string());
                }
            }
        }
        logger
    }

    /// Does every byte `config` emits end up on stdout? A missing primary
    /// appender counts, since it falls back to stdout.
    fn console_only(state: &LoadedState, config: &LoggerConfig) -> bool {
        let on_console = |name: &str| match state.config.appender_config(name) {
            Some(appender) if state.appenders.contains(name) => is_console_output(&appender.output),
            _ => true,
        };
        on_console(&config.appender) && config.appenders.iter().all(|hook| on_console(&hook.name))
    }

    /// Secondary route for a logger, resolved against this context's appenders.
    ///
    /// # Errors
    ///
    /// [`crate::LoggerError::NoSuchAppender`] when the named appender does not
    /// exist.
    pub fn new_hook(&self, logger: &LoggerConfig, hook: &HookAppenderConfig) -> Result<AppenderHook> {
        AppenderHook::from_config(logger, hook, self.appenders())
    }

    /// Names of the loggers created so far, sorted
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn flush(&self) -> Result<()> {
        self.appenders().flush_all()?;
        self.appenders().stdout().lock().flush()
    }
}

static GLOBAL: OnceLock<LoggingContext> = OnceLock::new();

/// Process-wide context, configured from the command line on first use.
pub fn global() -> &'static LoggingContext {
    GLOBAL.get_or_init(|| LoggingContext::new(ContextOptions::from_args(std::env::args().skip(1))))
}

/// Logger `name` from the process-wide context.
///
/// ```no_run
/// let log = logvin::logger("root");
/// log.info("hello world root");
/// ```
pub fn logger(name: &str) -> Arc<Logger> {
    global().logger(name)
}

/// Register a formatter in the process-wide context.
pub fn register_formatter<F>(name: impl Into<String>, factory: F) -> bool
where
    F: Fn(&LoggerConfig) -> Box<dyn Formatter> + Send + Sync + 'static,
{
    global().register_formatter(name, factory)
}
