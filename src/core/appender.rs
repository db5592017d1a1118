//! Appender trait for log output destinations

use super::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// A named byte sink receiving already formatted log lines.
pub trait Appender: Send {
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Appender shared between the registry, loggers and hooks.
pub type SharedAppender = Arc<Mutex<Box<dyn Appender>>>;

pub fn share(appender: Box<dyn Appender>) -> SharedAppender {
    Arc::new(Mutex::new(appender))
}
