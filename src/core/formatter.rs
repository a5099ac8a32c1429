//! Line formatting: timestamp prefix plus printf-style interpolation
//!
//! Interpolation is forgiving. A template that does not match its
//! arguments still renders, with the mismatch spelled out inline:
//!
//! | Situation               | Output                 |
//! |-------------------------|------------------------|
//! | verb without argument   | `%!d(MISSING)`         |
//! | unknown verb            | `%!z(value)`           |
//! | lone trailing `%`       | `%!(NOVERB)`           |
//! | unused arguments        | `%!(EXTRA a, b)`       |
//! | width above 1000000     | `%!(BADWIDTH)`         |
//!
//! # Examples
//!
//! ```
//! use rust_remote_logger::core::formatter::interpolate;
//!
//! assert_eq!(interpolate("x=%d", &[&5]), "x=5");
//! assert_eq!(interpolate("x=%d y=%d", &[&5]), "x=5 y=%!d(MISSING)");
//! assert_eq!(interpolate("done", &[&1, &"two"]), "done%!(EXTRA 1, two)");
//! ```

use super::log_level::LogLevel;
use super::log_line::LogLine;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Local};
use std::fmt::{Display, Write};
use std::iter::Peekable;
use std::str::Chars;

/// Interpolate `args` into a printf-style `template`.
///
/// A verb may carry flags (`-`, `+`, `0`, `#`, space), a width and a
/// `.precision` between the `%` and the verb letter, e.g. `%-8s`, `%05d`,
/// `%.2f`.
pub fn interpolate(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len() + 8 * args.len());
    let mut remaining = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let spec = VerbSpec::parse(&mut chars, &mut out);
        match chars.next() {
            None => out.push_str("%!(NOVERB)"),
            Some('%') => out.push('%'),
            Some(verb) => match remaining.next() {
                Some(arg) => spec.render(&mut out, verb, *arg),
                None => {
                    let _ = write!(out, "%!{}(MISSING)", verb);
                }
            },
        }
    }

    let extra: Vec<String> = remaining.map(|arg| arg.to_string()).collect();
    if !extra.is_empty() {
        let _ = write!(out, "%!(EXTRA {})", extra.join(", "));
    }

    out
}

/// Widths and precisions above this render `%!(BADWIDTH)` / `%!(BADPREC)`
const MAX_WIDTH: usize = 1_000_000;

/// Flags, width and precision between `%` and the verb
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct VerbSpec {
    left: bool,
    plus: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

impl VerbSpec {
    fn parse(chars: &mut Peekable<Chars<'_>>, out: &mut String) -> Self {
        let mut spec = Self::default();

        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.left = true,
                '+' => spec.plus = true,
                '0' => spec.zero = true,
                '#' | ' ' => {}
                _ => break,
            }
            chars.next();
        }

        spec.width = parse_number(chars);
        if spec.width.is_some_and(|w| w > MAX_WIDTH) {
            out.push_str("%!(BADWIDTH)");
            spec.width = None;
        }

        if chars.peek() == Some(&'.') {
            chars.next();
            let precision = parse_number(chars).unwrap_or(0);
            if precision > MAX_WIDTH {
                out.push_str("%!(BADPREC)");
            } else {
                spec.precision = Some(precision);
            }
        }

        spec
    }

    fn render(&self, out: &mut String, verb: char, arg: &dyn Display) {
        let body = match verb {
            'v' | 's' | 'd' | 'f' | 'g' | 't' => self.body(arg),
            'q' => format!("{:?}", self.body(arg)),
            other => {
                let _ = write!(out, "%!{}({})", other, arg);
                return;
            }
        };
        self.pad(out, &body);
    }

    fn body(&self, arg: &dyn Display) -> String {
        match (self.plus, self.precision) {
            (false, None) => arg.to_string(),
            (true, None) => format!("{:+}", arg),
            (false, Some(p)) => format!("{:.*}", p, arg),
            (true, Some(p)) => format!("{:+.*}", p, arg),
        }
    }

    fn pad(&self, out: &mut String, body: &str) {
        let width = self.width.unwrap_or(0);
        let _ = if self.left {
            write!(out, "{:<width$}", body)
        } else if self.zero {
            // Zeros go between the sign and the digits
            match body.strip_prefix(&['+', '-'][..]) {
                Some(digits) => write!(
                    out,
                    "{}{:0>w$}",
                    &body[..1],
                    digits,
                    w = width.saturating_sub(1)
                ),
                None => write!(out, "{:0>width$}", body),
            }
        } else {
            write!(out, "{:>width$}", body)
        };
    }
}

fn parse_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = Some(
            value
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit as usize),
        );
    }
    value
}

/// Renders level, template and arguments into a [`LogLine`]
#[derive(Debug, Clone, Default)]
pub struct LineFormatter {
    timestamp_format: TimestampFormat,
}

impl LineFormatter {
    pub fn new(timestamp_format: TimestampFormat) -> Self {
        Self { timestamp_format }
    }

    /// Format with the timestamp captured now
    pub fn format(&self, level: LogLevel, template: &str, args: &[&dyn Display]) -> LogLine {
        self.format_at(&Local::now(), level, template, args)
    }

    pub fn format_at(
        &self,
        at: &DateTime<Local>,
        level: LogLevel,
        template: &str,
        args: &[&dyn Display],
    ) -> LogLine {
        let message = interpolate(template, args);
        let text = format!(
            "[{}] [{}] {}",
            self.timestamp_format.format(at),
            level.to_str(),
            message
        );
        LogLine::new(level, text)
    }
}
