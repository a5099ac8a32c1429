//! Rendered log line

use super::log_level::LogLevel;
use std::fmt;

/// A fully rendered `[timestamp] [LEVEL] message` line.
///
/// Immutable once built. The text carries no line terminator; the console
/// adds one and remote payloads join lines with `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    level: LogLevel,
    text: String,
}

impl LogLine {
    pub fn new(level: LogLevel, text: String) -> Self {
        Self { level, text }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Text followed by the line terminator, as written to the console
    pub fn terminated(&self) -> String {
        let mut out = String::with_capacity(self.text.len() + 1);
        out.push_str(&self.text);
        out.push('\n');
        out
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<LogLine> for String {
    fn from(line: LogLine) -> Self {
        line.text
    }
}
