//! Styled report sections for terminal output
//!
//! Every method writes to a caller-supplied sink so commands can hold one
//! stdout lock for a whole report and tests can capture the text.

use std::env::VarError;
use std::io::{self, Write};

const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const BLUE: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";

/// Writes headers, key/value lines and status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Printer {
    color: bool,
}

impl Printer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Color unless `NO_COLOR` is set
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Same as [`Printer::from_env`] with a custom variable reader
    pub fn from_reader<F>(reader: F) -> Self
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        Self::new(reader("NO_COLOR").is_err())
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Section title underlined to its own width
    pub fn header<W: Write>(&self, out: &mut W, title: &str) -> io::Result<()> {
        let rule = "\u{2550}".repeat(title.chars().count().max(20));
        if self.color {
            writeln!(out, "\n{BOLD}{title}{RESET}\n{rule}")
        } else {
            writeln!(out, "\n{title}\n{rule}")
        }
    }

    pub fn key_value<W: Write>(
        &self,
        out: &mut W,
        key: &str,
        value: impl std::fmt::Display,
    ) -> io::Result<()> {
        if self.color {
            writeln!(out, "  {BOLD}{key}:{RESET} {value}")
        } else {
            writeln!(out, "  {key}: {value}")
        }
    }

    pub fn success<W: Write>(&self, out: &mut W, message: &str) -> io::Result<()> {
        if self.color {
            writeln!(out, "{GREEN}\u{2713}{RESET} {message}")
        } else {
            writeln!(out, "OK: {message}")
        }
    }

    pub fn info<W: Write>(&self, out: &mut W, message: &str) -> io::Result<()> {
        if self.color {
            writeln!(out, "{BLUE}\u{2139}{RESET} {message}")
        } else {
            writeln!(out, "Info: {message}")
        }
    }

    /// Numbered follow-up commands
    pub fn next_steps<W: Write>(&self, out: &mut W, steps: &[String]) -> io::Result<()> {
        writeln!(out, "\nNext steps:")?;
        for (i, step) in steps.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, step)?;
        }
        Ok(())
    }
}
