//! Console output helpers.
//!
//! Reports go to stdout so they can be piped; colors are only applied when
//! the stream is a terminal. An `Output` can instead collect its lines as
//! plain text, which is what the command tests read back.

use std::sync::Arc;

use owo_colors::{OwoColorize, Stream::Stderr, Stream::Stdout};
use parking_lot::Mutex;

#[derive(Debug, Clone, Default)]
pub struct Output {
    captured: Option<Arc<Mutex<Vec<String>>>>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// An output that records every line (uncolored) instead of printing.
    pub fn capturing() -> Self {
        Self {
            captured: Some(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    /// Lines recorded so far; empty unless built with [`Output::capturing`].
    pub fn lines(&self) -> Vec<String> {
        self.captured
            .as_ref()
            .map(|lines| lines.lock().clone())
            .unwrap_or_default()
    }

    /// Record `line` if capturing. Returns false when it should be printed.
    fn capture(&self, line: &str) -> bool {
        match &self.captured {
            Some(lines) => {
                lines.lock().push(line.to_string());
                true
            }
            None => false,
        }
    }

    /// Bold heading preceded by a blank line.
    pub fn section(&self, title: &str) {
        if self.capture("") && self.capture(title) {
            return;
        }
        println!();
        println!(
            "{}",
            title.if_supports_color(Stdout, |t| t.bright_cyan().bold().to_string())
        );
    }

    pub fn print(&self, line: &str) {
        if self.capture(line) {
            return;
        }
        println!("{}", line);
    }

    pub fn status(&self, message: &str) {
        if self.capture(message) {
            return;
        }
        println!("{}", message);
    }

    pub fn success(&self, message: &str) {
        if self.capture(message) {
            return;
        }
        println!(
            "{}",
            message.if_supports_color(Stdout, |t| t.bright_green().to_string())
        );
    }

    pub fn warning(&self, message: &str) {
        if self.capture(message) {
            return;
        }
        println!(
            "{}",
            message.if_supports_color(Stdout, |t| t.yellow().to_string())
        );
    }

    pub fn error(&self, message: &str) {
        if self.capture(message) {
            return;
        }
        eprintln!(
            "{}",
            message.if_supports_color(Stderr, |t| t.bright_red().to_string())
        );
    }

    /// `label value` with the label highlighted.
    pub fn info(&self, label: &str, value: &str) {
        if self.capture(&format!("{} {}", label, value)) {
            return;
        }
        println!(
            "{} {}",
            label.if_supports_color(Stdout, |t| t.bright_cyan().to_string()),
            value
        );
    }

    pub fn list_item(&self, item: &str) {
        let line = format!(" - {}", item);
        if self.capture(&line) {
            return;
        }
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_capturing_records_plain_lines() {
        let output = Output::capturing();
        output.section("Title");
        output.info("Database:", "app.sqlite3");
        output.list_item("entry");
        output.error("broken");

        assert_eq!(
            output.lines(),
            vec!["", "Title", "Database: app.sqlite3", " - entry", "broken"]
        );
    }

    #[test]
    fn test_plain_output_records_nothing() {
        assert!(Output::new().lines().is_empty());
    }
}
