//! Output formatting infrastructure for CLI commands.

use std::time::Duration;

use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::error::Advisory;

/// Output mode for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Markdown,
}

impl OutputMode {
    pub fn from_flags(json: bool, md: bool) -> Self {
        if json {
            OutputMode::Json
        } else if md {
            OutputMode::Markdown
        } else {
            OutputMode::Human
        }
    }
}

/// Detail level for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailLevel {
    Brief,
    Standard,
    Full,
}

impl DetailLevel {
    pub fn from_flags(brief: bool, full: bool) -> Self {
        if brief {
            DetailLevel::Brief
        } else if full {
            DetailLevel::Full
        } else {
            DetailLevel::Standard
        }
    }

    /// Characters of segment text shown in tables.
    pub fn preview_len(self) -> Option<usize> {
        match self {
            DetailLevel::Brief => Some(40),
            DetailLevel::Standard => Some(80),
            DetailLevel::Full => None,
        }
    }
}

/// Print a single item as pretty-printed JSON.
pub fn output_json<T: Serialize>(item: &T) {
    match serde_json::to_string_pretty(item) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("Failed to serialize to JSON: {}", e)),
    }
}

/// Print a list of items as a JSON array.
pub fn output_json_list<T: Serialize>(items: &[T]) {
    match serde_json::to_string_pretty(items) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("Failed to serialize to JSON: {}", e)),
    }
}

/// Print a formatted table with headers and rows.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    if rows.is_empty() {
        println!("{}", "No results found.".dimmed());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(headers);

    for row in rows {
        table.add_row(row);
    }

    println!("{table}");
}

/// Print a Markdown table with headers and rows.
pub fn print_markdown_table(headers: &[&str], rows: Vec<Vec<String>>) {
    println!("| {} |", headers.join(" | "));
    println!("|{}", "---|".repeat(headers.len()));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| c.replace('|', "\\|")).collect();
        println!("| {} |", cells.join(" | ").replace('\n', " "));
    }
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", "OK".green().bold(), msg);
}

/// Print a warning message to stderr.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), msg);
}

/// Print an error message to stderr.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

/// Print a bold section header.
pub fn print_header(title: &str) {
    println!("\n{}\n", title.bold());
}

/// Print a key-value pair line.
pub fn print_kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a dimmed hint/suggestion message.
pub fn print_hint(msg: &str) {
    println!("{}", msg.dimmed());
}

/// Print advisories as warnings, one per line.
pub fn print_advisories(advisories: &[Advisory]) {
    for advisory in advisories {
        print_warning(&advisory.to_string());
    }
}

/// Spinner on stderr for work that takes a moment.
pub fn create_spinner(msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Shorten `text` to `max` characters on one line.
pub fn truncate(text: &str, max: Option<usize>) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match max {
        Some(max) if flat.chars().count() > max => {
            let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
            format!("{}...", cut)
        }
        _ => flat,
    }
}

/// Confidence rendered with a color cue.
pub fn format_confidence(confidence: f64, ask_human: bool) -> String {
    let text = format!("{:.2}", confidence);
    if ask_human {
        text.red().bold().to_string()
    } else if confidence < 1.0 {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    }
}
