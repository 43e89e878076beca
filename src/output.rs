//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Archive
//!     142 messages (139 live, 3 deleted)
//!     Numbers 0000 to 0141
//! Folders
//! 001 2024/05/ (80 messages)
//! 002 2024/06/ (59 messages)
//! Indices
//!     thread → index.html
//!     date → date.html
//! Config
//!     config.toml
//! ```
//!
//! ## Build
//!
//! ```text
//! Articles: 139 unchanged, 3 written (142 total)
//! New messages: 2 (previous last 0139)
//! Pages
//!     index.html → updated
//!     date.html → unchanged
//! Removed
//!     0007.html
//! Store: .mailarc-store.json
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::archive::{Archive, Filter};
use crate::config::RenderConfig;
use crate::generate::GenerateReport;
use crate::incremental::WriteOutcome;
use crate::naming;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn outcome_label(outcome: WriteOutcome) -> &'static str {
    match outcome {
        WriteOutcome::Created => "created",
        WriteOutcome::Updated => "updated",
        WriteOutcome::Unchanged => "unchanged",
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(archive: &Archive, config: &RenderConfig, has_config_file: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let live = archive.live_count(&Filter::default());

    lines.push("Archive".to_string());
    lines.push(format!(
        "{}{} messages ({} live, {} deleted)",
        indent(1),
        archive.len(),
        live,
        archive.len() - live
    ));
    if let (Some(first), Some(last)) = (archive.first_msgnum(), archive.max_msgnum()) {
        lines.push(format!(
            "{}Numbers {} to {}",
            indent(1),
            naming::message_name(first),
            naming::message_name(last)
        ));
    }

    if !archive.folders().is_empty() {
        lines.push("Folders".to_string());
        for (i, folder) in archive.folders().iter().enumerate() {
            lines.push(format!("{} {} ({} messages)", format_index(i + 1), folder.name, folder.count));
        }
    }

    lines.push("Indices".to_string());
    for kind in config.indices.enabled() {
        lines.push(format!(
            "{}{} \u{2192} {}",
            indent(1),
            kind.slug(),
            kind.file_name(config.indices.default)
        ));
    }

    lines.push("Config".to_string());
    if has_config_file {
        lines.push(format!("{}config.toml", indent(1)));
    } else {
        lines.push(format!("{}(stock defaults)", indent(1)));
    }
    lines
}

pub fn print_check_output(archive: &Archive, config: &RenderConfig, has_config_file: bool) {
    for line in format_check_output(archive, config, has_config_file) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_generate_output(report: &GenerateReport, config: &RenderConfig) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("Articles: {}", report.articles));

    let new = report.new_messages();
    match report.previous_max {
        Some(prev) => lines.push(format!(
            "New messages: {} (previous last {})",
            new,
            naming::message_name(prev)
        )),
        None => lines.push(format!("New messages: {}", new)),
    }

    if config.output.report_new_files && !report.new_articles.is_empty() {
        lines.push("New articles".to_string());
        for rel in &report.new_articles {
            lines.push(format!("{}{}", indent(1), rel));
        }
    }

    if !report.pages.is_empty() {
        lines.push("Pages".to_string());
        for page in &report.pages {
            lines.push(format!("{}{} \u{2192} {}", indent(1), page.path, outcome_label(page.outcome)));
        }
    }

    if !report.removed.is_empty() {
        lines.push("Removed".to_string());
        for rel in &report.removed {
            lines.push(format!("{}{}", indent(1), rel));
        }
    }

    if report.store_saved {
        lines.push("Store: .mailarc-store.json".to_string());
    }
    lines
}

pub fn print_generate_output(report: &GenerateReport, config: &RenderConfig) {
    for line in format_generate_output(report, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
