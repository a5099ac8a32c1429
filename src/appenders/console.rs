//! Console appender implementation

use crate::core::{Appender, LogLine, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::{self, Write};

/// Writes Debug/Info lines to stdout and Warn/Error/Fatal lines to stderr
pub struct ConsoleAppender {
    use_colors: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self { use_colors: false }
    }

    /// Color whole lines by level (requires the `console` feature)
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn render(&self, line: &LogLine) -> String {
        #[cfg(feature = "console")]
        if self.use_colors {
            return line
                .as_str()
                .color(line.level().color_code())
                .to_string();
        }
        line.as_str().to_string()
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, line: &LogLine) -> Result<()> {
        let output = self.render(line);

        if line.level().is_stderr() {
            let mut stderr = io::stderr().lock();
            writeln!(stderr, "{}", output)?;
        } else {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", output)?;
            stdout.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        // Flush both stdout and stderr since we write to both
        io::stdout().flush()?;
        io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
