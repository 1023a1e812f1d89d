//! Human-readable and JSON rendering of results.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset};
use docinfer_core::{BatchResult, MetadataResult};
use serde::Serialize;

const NOT_AVAILABLE: &str = "Not available";
const SUMMARY_WIDTH: usize = 60;
const SUMMARY_LABEL: &str = "Summary: ";

pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Tree view of one file: embedded properties, then the AI section when present.
pub fn render_metadata(result: &MetadataResult, model: &str) -> String {
    let embedded = &result.embedded;
    let mut embedded_lines = vec![
        field("Title", embedded.title.as_deref()),
        field("Author", embedded.author.as_deref()),
        field("Subject", embedded.subject.as_deref()),
        field("Creator", embedded.creator.as_deref()),
        field("Producer", embedded.producer.as_deref()),
        date_field("Created", embedded.creation_date.as_ref()),
        date_field("Modified", embedded.modification_date.as_ref()),
    ];
    embedded_lines.push(format!(
        "Pages: {} (analyzed: {})",
        result.page_count, result.pages_analyzed
    ));

    let mut sections = vec![("EMBEDDED METADATA".to_string(), embedded_lines)];

    if let Some(ai) = &result.ai_generated {
        let mut ai_lines = Vec::new();
        let summary = wrap_text(&ai.summary, SUMMARY_WIDTH);
        let indent = " ".repeat(SUMMARY_LABEL.len());
        for (index, line) in summary.iter().enumerate() {
            if index == 0 {
                ai_lines.push(format!("{SUMMARY_LABEL}{line}"));
            } else {
                ai_lines.push(format!("{indent}{line}"));
            }
        }
        ai_lines.push(format!("Keywords: {}", ai.keywords.join(" ")));
        ai_lines.push(format!("Category: {}", ai.category));
        ai_lines.push(format!("Suggested: {}", ai.suggested_filename));
        sections.push((format!("AI-GENERATED (via {model})"), ai_lines));
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", result.file_name);
    let last_section = sections.len() - 1;
    for (index, (heading, lines)) in sections.iter().enumerate() {
        let last = index == last_section;
        let (branch, indent) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        let _ = writeln!(out, "{branch}{heading}");
        for (line_index, line) in lines.iter().enumerate() {
            let leaf = if line_index + 1 == lines.len() {
                "└── "
            } else {
                "├── "
            };
            let _ = writeln!(out, "{indent}{leaf}{line}");
        }
    }
    out
}

/// Summary block, one entry per processed file, then the failures.
pub fn render_batch(batch: &BatchResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Batch Processing Complete");
    let _ = writeln!(out);
    let _ = writeln!(out, "Directory: {}", batch.directory.display());
    let _ = writeln!(out, "Total files: {}", batch.total_files);
    let _ = writeln!(out, "Successful: {}", batch.successful);
    let _ = writeln!(out, "Failed: {}", batch.failed);

    if !batch.results.is_empty() {
        let _ = writeln!(out, "\nResults:\n");
        for result in &batch.results {
            let title = result.embedded.title.as_deref().unwrap_or(&result.file_name);
            let author = result.embedded.author.as_deref().unwrap_or("Unknown");
            let _ = writeln!(out, "  ✓ {}", result.file_name);
            let _ = writeln!(out, "      Title: {title}");
            let _ = writeln!(out, "      Author: {author}");
            if let Some(ai) = &result.ai_generated {
                let _ = writeln!(out, "      Category: {}", ai.category);
                let _ = writeln!(out, "      Suggested: {}", ai.suggested_filename);
            }
            for warning in &result.warnings {
                let _ = writeln!(out, "      Warning: {warning}");
            }
            let _ = writeln!(out);
        }
    }

    if !batch.errors.is_empty() {
        let _ = writeln!(out, "\nErrors:\n");
        for error in &batch.errors {
            let _ = writeln!(out, "  ✗ {}", error.file);
            let _ = writeln!(out, "      {}", error.error);
        }
    }
    out
}

/// Greedy word wrap; a word longer than `width` gets a line of its own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();
        if current.is_empty() {
            current.push_str(word);
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn field(label: &str, value: Option<&str>) -> String {
    format!("{label}: {}", value.unwrap_or(NOT_AVAILABLE))
}

fn date_field(label: &str, value: Option<&DateTime<FixedOffset>>) -> String {
    match value {
        Some(date) => format!("{label}: {}", date.format("%Y-%m-%d")),
        None => format!("{label}: {NOT_AVAILABLE}"),
    }
}

pub fn print_warning(message: &str) {
    println!("Warning: {message}");
}

pub fn print_error(message: &str) {
    eprintln!("Error: {message}");
}
