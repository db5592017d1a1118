//! Console appender implementation

use crate::core::{Appender, Result};
use std::io::Write;

/// Writes to the process-wide standard output stream.
pub struct ConsoleAppender {
    name: String,
}

impl ConsoleAppender {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new(crate::config::STDOUT)
    }
}

impl Appender for ConsoleAppender {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Is `output` one of the console spellings (`console`, `stdout`, any case)?
pub(crate) fn is_console_output(output: &str) -> bool {
    output.eq_ignore_ascii_case(crate::config::CONSOLE)
        || output.eq_ignore_ascii_case(crate::config::STDOUT)
}
