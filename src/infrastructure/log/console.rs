//! Console Log
//!
//! Human-readable progress on stderr. Debug records (command lines and
//! raw output) only appear in verbose mode; they always reach the file
//! log. Color follows the terminal and `NO_COLOR`.

use std::io::{self, Write};

use crossterm::style::{Color, Stylize};
use is_terminal::IsTerminal;

use crate::domain::ports::{DeployLog, LogLevel};

mod colors {
    use crossterm::style::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

pub struct ConsoleLog {
    verbose: bool,
    color: bool,
}

impl ConsoleLog {
    pub fn new(verbose: bool) -> Self {
        let color = io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self { verbose, color }
    }

    /// Plain output regardless of terminal (for testing)
    #[cfg(test)]
    fn plain(verbose: bool) -> Self {
        Self {
            verbose,
            color: false,
        }
    }

    fn render(&self, level: LogLevel, message: &str) -> Option<String> {
        let (icon, color): (&str, Color) = match level {
            LogLevel::Debug if !self.verbose => return None,
            LogLevel::Debug => (" ", colors::DIM),
            LogLevel::Info => ("●", colors::INFO),
            LogLevel::Success => ("✓", colors::SUCCESS),
            LogLevel::Warning => ("⚠", colors::WARNING),
            LogLevel::Error => ("✗", colors::ERROR),
        };

        let body = if level == LogLevel::Debug && self.color {
            message.with(colors::DIM).to_string()
        } else {
            message.to_string()
        };
        if self.color {
            Some(format!("{} {}", icon.with(color), body))
        } else {
            Some(format!("{} {}", icon, body))
        }
    }
}

impl DeployLog for ConsoleLog {
    fn record(&self, level: LogLevel, message: &str) {
        if let Some(line) = self.render(level, message) {
            let _ = writeln!(io::stderr().lock(), "{}", line);
        }
    }
}
