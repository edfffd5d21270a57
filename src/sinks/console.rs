//! Terminal sink

use crate::core::{LogSink, Meta, Result, Severity};
#[cfg(feature = "console")]
use colored::Colorize;

pub struct TerminalSink {
    use_colors: bool,
    show_meta: bool,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            use_colors: cfg!(feature = "console"),
            show_meta: true,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            show_meta: true,
        }
    }

    /// Append metadata as `key=value` pairs (default: on)
    #[must_use]
    pub fn with_meta(mut self, show_meta: bool) -> Self {
        self.show_meta = show_meta;
        self
    }

    /// `<level>: <text> [key=value ...]`
    pub fn format_line(&self, level: Severity, text: &str, meta: &Meta) -> String {
        let level_str = self.format_level(level);
        if self.show_meta && !meta.is_empty() {
            format!("{}: {} {}", level_str, text, meta.format_fields())
        } else {
            format!("{}: {}", level_str, text)
        }
    }

    #[cfg(feature = "console")]
    fn format_level(&self, level: Severity) -> String {
        if self.use_colors {
            level.to_str().color(level.color_code()).to_string()
        } else {
            level.to_str().to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn format_level(&self, level: Severity) -> String {
        level.to_str().to_string()
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for TerminalSink {
    fn deliver(&self, level: Severity, text: &str, meta: &Meta) -> Result<()> {
        let output = self.format_line(level, text, meta);

        // Errors go to stderr, everything else to stdout
        match level {
            Severity::Error => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "terminal"
    }
}
