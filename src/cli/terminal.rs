//! Terminal capability detection and rendering utilities

use std::{borrow::Cow, fmt::Write as _, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, colors::css};
use resalloc::domain::{pagination::PageItem, request::RequestStatus};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Check if terminal is narrow (< 100 columns)
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 100)
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Color as error (red)
    fn error(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn warning(&self) -> String {
        if supports_color() {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    fn info(&self) -> String {
        if supports_color() {
            self.fg::<css::LightBlue>().to_string()
        } else {
            self.to_string()
        }
    }

    fn error(&self) -> String {
        if supports_color() {
            self.fg::<css::Crimson>().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn error(&self) -> String {
        self.as_str().error()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}

/// Colour applied to a table cell after padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Plain,
    Warning,
    Info,
    Error,
}

impl Tone {
    fn paint(self, text: &str) -> String {
        match self {
            Self::Plain => text.to_string(),
            Self::Warning => text.warning(),
            Self::Info => text.info(),
            Self::Error => text.error(),
        }
    }
}

/// Tone used for a request status badge.
pub const fn status_tone(status: &RequestStatus) -> Tone {
    match status {
        RequestStatus::Waiting => Tone::Warning,
        RequestStatus::InProgress => Tone::Info,
        RequestStatus::Cancelled => Tone::Error,
        RequestStatus::Other(_) => Tone::Plain,
    }
}

/// A table cell: its text and the tone it is painted in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    text: String,
    tone: Tone,
}

impl Cell {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self::new(text, Tone::Plain)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::new(text, Tone::Plain)
    }
}

/// Lays out `rows` under `headers` with aligned columns.
///
/// Widths are measured on the unpainted text so colour codes never skew the
/// alignment.
pub fn format_table(headers: &[&str], rows: &[Vec<Cell>]) -> String {
    let widths = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.text.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
        })
        .collect::<Vec<_>>();

    let mut out = String::new();
    for (header, width) in headers.iter().zip(&widths) {
        let _ = write!(out, "{header:<width$}  ");
    }
    out = out.trim_end().to_string();
    out.push('\n');

    for width in &widths {
        let _ = write!(out, "{:-<width$}  ", "");
    }
    out = out.trim_end().to_string();
    out.push('\n');

    for row in rows {
        let mut line = String::new();
        for (cell, width) in row.iter().zip(&widths) {
            let padded = format!("{:<width$}", cell.text);
            let _ = write!(line, "{}  ", cell.tone.paint(&padded));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

/// Prints a table to stdout.
pub fn print_table(headers: &[&str], rows: &[Vec<Cell>]) {
    print!("{}", format_table(headers, rows));
}

/// Renders the page window with the current page bracketed.
pub fn format_footer(window: &[PageItem], current: usize) -> String {
    window
        .iter()
        .map(|item| match item {
            PageItem::Page(page) if *page == current => format!("[{page}]"),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prints the pagination footer of a list.
pub fn print_footer(window: &[PageItem], current: usize, total_pages: usize, total: usize, noun: &str) {
    if total_pages == 0 {
        return;
    }
    println!();
    println!(
        "{}  {}",
        format_footer(window, current),
        format!("page {current} of {total_pages}, {total} {noun}").dim()
    );
}

/// Starts a spinner on stderr; call `finish_and_clear` when done.
pub fn spinner(message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_aligned_to_widest_cell() {
        let rows = vec![
            vec![Cell::from("RR-1"), Cell::from("Waiting")],
            vec![Cell::from("RR-1000"), Cell::from("Cancelled")],
        ];
        let table = format_table(&["ID", "Status"], &rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "ID       Status");
        assert_eq!(lines[1], "-------  ---------");
        assert_eq!(lines[2], "RR-1     Waiting");
        assert_eq!(lines[3], "RR-1000  Cancelled");
    }

    #[test]
    fn footer_brackets_current_page() {
        let window = resalloc::domain::pagination::window(5, 10);
        assert_eq!(format_footer(&window, 5), "1 … 4 [5] 6 … 10");
    }

    #[test]
    fn status_tones() {
        assert_eq!(status_tone(&RequestStatus::Waiting), Tone::Warning);
        assert_eq!(status_tone(&RequestStatus::Cancelled), Tone::Error);
        assert_eq!(
            status_tone(&RequestStatus::Other("Done".to_string())),
            Tone::Plain
        );
    }
}
