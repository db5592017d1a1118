//! Internal diagnostics channel
//!
//! Reports what the facade itself is doing (config path, load outcome,
//! appender failures, fallbacks) on stderr, separate from the configured
//! loggers, which may not exist yet when these events happen. Messages are
//! also kept in memory so callers and tests can inspect them.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

const PREFIX: &str = "[logvin]";

/// Upper bound on retained messages; older ones are discarded first.
const MAX_RETAINED: usize = 1024;

/// # Example
///
/// ```
/// use logvin::Diagnostics;
///
/// let diagnostics = Diagnostics::quiet();
/// diagnostics.report("load ./config/logger.yaml success");
/// diagnostics.record_appender_fallback();
///
/// assert_eq!(diagnostics.messages().len(), 1);
/// assert_eq!(diagnostics.appender_fallbacks(), 1);
/// ```
#[derive(Debug)]
pub struct Diagnostics {
    echo: bool,
    messages: Mutex<VecDeque<String>>,

    /// Appenders whose construction failed
    appender_failures: AtomicU64,

    /// Loggers that fell back to stdout because their appender was missing
    appender_fallbacks: AtomicU64,

    /// Secondary routes that could not be attached
    hook_failures: AtomicU64,
}

impl Diagnostics {
    /// Diagnostics echoed to stderr
    pub fn new() -> Self {
        Self::with_echo(true)
    }

    /// Diagnostics kept in memory only
    pub fn quiet() -> Self {
        Self::with_echo(false)
    }

    fn with_echo(echo: bool) -> Self {
        Self {
            echo,
            messages: Mutex::new(VecDeque::with_capacity(64)),
            appender_failures: AtomicU64::new(0),
            appender_fallbacks: AtomicU64::new(0),
            hook_failures: AtomicU64::new(0),
        }
    }

    pub fn report(&self, message: impl Into<String>) {
        let message = message.into();
        if self.echo {
            eprintln!("{} {}", PREFIX, message);
        }
        let mut messages = self.messages.lock();
        if messages.len() >= MAX_RETAINED {
            messages.pop_front();
        }
        messages.push_back(message);
    }

    /// Snapshot of retained messages, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().iter().cloned().collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages.lock().iter().any(|m| m.contains(needle))
    }

    #[inline]
    pub fn record_appender_failure(&self) -> u64 {
        self.appender_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_appender_fallback(&self) -> u64 {
        self.appender_fallbacks.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_hook_failure(&self) -> u64 {
        self.hook_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn appender_failures(&self) -> u64 {
        self.appender_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn appender_fallbacks(&self) -> u64 {
        self.appender_fallbacks.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn hook_failures(&self) -> u64 {
        self.hook_failures.load(Ordering::Relaxed)
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}
