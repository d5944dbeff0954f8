//! Terminal rendering of catalogs and session listings

use crate::export::format_size;
use crate::model::{total_size_bytes, CatalogRecord, Session, SessionSummary};
use colored::*;
use serde::Serialize;

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,   // Only errors
    Normal,  // Standard output
    Verbose, // More details including relative paths
}

impl OutputMode {
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            OutputMode::Quiet
        } else if verbose >= 1 {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}

/// Serialize any value as pretty JSON on stdout (for scripting).
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_catalog(records: &[CatalogRecord], mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }
    if records.is_empty() {
        println!("No video files found.");
        return;
    }

    println!();
    println!(
        "{:<42} {:>12} {:>6}  {}",
        "Name".cyan().bold(),
        "Size".cyan().bold(),
        "Ext".cyan().bold(),
        "Folder".cyan().bold()
    );
    println!("{}", "-".repeat(100));
    for record in records {
        let marker = if record.failed {
            "[!] ".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "{}{:<42} {:>12} {:>6}  {}",
            marker,
            truncate(&record.name, 42),
            record.size_display,
            record.extension.trim_start_matches('.'),
            record.folder
        );
        if mode == OutputMode::Verbose {
            println!("    {}", record.relative_path.dimmed());
        }
    }
    println!("{}", "-".repeat(100));
    println!(
        "{} video{}, {}",
        records.len(),
        if records.len() == 1 { "" } else { "s" },
        format_size(total_size_bytes(records))
    );
}

pub fn print_session(session: &Session, mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }
    println!();
    println!("{} {}", "Session:".bold(), session.name);
    println!("  id:      {}", session.id);
    println!("  roots:   {}", session.roots.join(", "));
    println!("  created: {}", session.created_at.format("%Y-%m-%d %H:%M"));
    println!("  updated: {}", session.updated_at.format("%Y-%m-%d %H:%M"));
    print_catalog(&session.records, mode);
}

pub fn print_sessions(summaries: &[SessionSummary], mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }
    if summaries.is_empty() {
        println!("No saved sessions.");
        return;
    }

    println!();
    println!(
        "{:<24} {:<28} {:>7} {:>12}  {}",
        "ID".cyan().bold(),
        "Name".cyan().bold(),
        "Videos".cyan().bold(),
        "Size".cyan().bold(),
        "Updated".cyan().bold()
    );
    println!("{}", "-".repeat(95));
    for summary in summaries {
        println!(
            "{:<24} {:<28} {:>7} {:>12}  {}",
            summary.id,
            truncate(&summary.name, 28),
            summary.record_count,
            format_size(summary.total_size_bytes),
            summary.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
