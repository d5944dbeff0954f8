use clap::{ArgAction, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::*;

use crate::config::Config;
use crate::export::{self, ExportFormat, ExportOptions};
use crate::merge::{self, MergeOutcome};
use crate::metadata;
use crate::model::{dedup_roots, CatalogRecord, Session};
use crate::output::{self, OutputMode};
use crate::portable;
use crate::progress;
use crate::scanner;
use crate::store::SessionStore;

#[derive(Parser)]
#[command(name = "vidcat")]
#[command(version)]
#[command(about = "Catalog video files into named, resumable sessions")]
#[command(long_about = "Vidcat scans directories for video files, keeps the results as \
    named sessions you can resume and grow, and exports them as portable reports.\n\n\
    Examples:\n  \
    vidcat scan ~/Videos --save movies     # Scan and save a session\n  \
    vidcat sessions                        # List saved sessions\n  \
    vidcat add session_17244576 ~/Archive  # Merge another directory in\n  \
    vidcat export --markdown -o report.md  # Export the last session")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan directories for video files
    #[command(visible_alias = "s")]
    Scan {
        /// Directories to scan
        #[arg(required = true, value_name = "DIR")]
        paths: Vec<PathBuf>,

        /// Save the catalog as a new session with this name
        #[arg(long, value_name = "NAME")]
        save: Option<String>,

        /// Output the catalog as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List saved sessions, most recently updated first
    Sessions {
        /// Output the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reload the most recently touched session
    Resume {
        /// Output the session as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a saved session by id
    Load {
        /// Session id (see `vidcat sessions`)
        id: String,

        /// Output the session as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan additional directories into an existing session
    Add {
        /// Session id to grow
        id: String,

        /// Directories to add
        #[arg(required = true, value_name = "DIR")]
        paths: Vec<PathBuf>,
    },

    /// Delete a saved session
    Delete {
        /// Session id to delete
        id: String,
    },

    /// Export a session catalog as an HTML or Markdown report
    Export {
        /// Session id; defaults to the last-touched session
        id: Option<String>,

        /// Write a Markdown report instead of HTML
        #[arg(long)]
        markdown: bool,

        /// Destination file; defaults to catalog_<date>.<ext>
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report title
        #[arg(long, value_name = "TITLE")]
        title: Option<String>,
    },

    /// Export a session to a portable JSON file
    ExportSession {
        /// Session id to export
        id: String,

        /// Destination file; defaults to <session-name>.json
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Import a session from a portable JSON file
    ImportSession {
        /// Portable session file to read
        file: PathBuf,

        /// Save the imported catalog as a new session
        #[arg(long)]
        save: bool,

        /// Name for the saved session (defaults to the name in the file)
        #[arg(long, value_name = "NAME", requires = "save")]
        name: Option<String>,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mode = OutputMode::from_flags(self.quiet, self.verbose);
        let config = Config::load();
        let store = SessionStore::open(&config.sessions_dir())
            .context("failed to open session store")?;

        match self.command {
            Commands::Scan { paths, save, json } => {
                let roots = canonical_roots(&paths)?;
                let records = scan_catalog(&roots, mode);
                report_failures(&records, mode);
                if json {
                    output::print_json(&records)?;
                } else {
                    output::print_catalog(&records, mode);
                }
                if let Some(name) = save {
                    let session = store.create(&name, roots, records)?;
                    if mode != OutputMode::Quiet {
                        println!(
                            "{} session \"{}\" saved as {}",
                            "Saved:".green(),
                            session.name,
                            session.id
                        );
                    }
                }
                Ok(())
            }

            Commands::Sessions { json } => {
                let summaries = store.list()?;
                if json {
                    output::print_json(&summaries)?;
                } else {
                    output::print_sessions(&summaries, mode);
                }
                Ok(())
            }

            Commands::Resume { json } => {
                let session = store.load_last()?;
                show_session(&session, json, mode)
            }

            Commands::Load { id, json } => {
                let session = store.get(&id)?;
                store.mark_last(&session)?;
                show_session(&session, json, mode)
            }

            Commands::Add { id, paths } => {
                let session = store.get(&id)?;
                let roots = canonical_roots(&paths)?;

                let bar = (mode != OutputMode::Quiet)
                    .then(|| progress::scan_spinner("Rescanning session..."));
                let outcome = merge::add_roots(&store, &session, &roots, mode, |event| {
                    if let Some(bar) = &bar {
                        bar.set_message(format!(
                            "{}/{} {}",
                            event.processed, event.total, event.current_file
                        ));
                    }
                })?;
                if let Some(bar) = &bar {
                    progress::finish_and_clear(bar);
                }

                if mode == OutputMode::Quiet {
                    return Ok(());
                }
                match outcome {
                    MergeOutcome::NothingFound => {
                        println!("No video files found under the new directories; session unchanged.");
                    }
                    MergeOutcome::AllDuplicates { duplicate_count } => {
                        println!(
                            "All {duplicate_count} videos found are already in the session; nothing added."
                        );
                    }
                    MergeOutcome::Merged {
                        session,
                        merged_count,
                        new_count,
                        duplicate_count,
                    } => {
                        println!(
                            "{} {new_count} new video{} added ({duplicate_count} duplicate{} skipped); \
                             session \"{}\" now has {merged_count} videos.",
                            "Merged:".green(),
                            if new_count == 1 { "" } else { "s" },
                            if duplicate_count == 1 { "" } else { "s" },
                            session.name
                        );
                    }
                }
                Ok(())
            }

            Commands::Delete { id } => {
                store.delete(&id)?;
                if mode != OutputMode::Quiet {
                    println!("Deleted session {id}");
                }
                Ok(())
            }

            Commands::Export {
                id,
                markdown,
                output,
                title,
            } => {
                let session = match id {
                    Some(id) => store.get(&id)?,
                    None => store.load_last()?,
                };
                let format = if markdown {
                    ExportFormat::Markdown
                } else {
                    ExportFormat::Html
                };
                let options = ExportOptions {
                    title: title
                        .or_else(|| config.export_title.clone())
                        .or_else(|| Some(session.name.clone())),
                    generated_at: None,
                };
                let content = export::render(&session.records, format, &options);
                let destination = output
                    .unwrap_or_else(|| PathBuf::from(export::default_export_filename(format)));
                fs::write(&destination, content).with_context(|| {
                    format!("failed to write report to {}", destination.display())
                })?;
                if mode != OutputMode::Quiet {
                    println!(
                        "{} report written to {}",
                        "Exported:".green(),
                        destination.display()
                    );
                }
                Ok(())
            }

            Commands::ExportSession { id, output } => {
                let session = store.get(&id)?;
                let document = portable::export_document(&session);
                let json =
                    portable::to_json(&document).context("failed to serialize session")?;
                let destination = output
                    .unwrap_or_else(|| PathBuf::from(default_session_filename(&session)));
                fs::write(&destination, json).with_context(|| {
                    format!("failed to write session file to {}", destination.display())
                })?;
                if mode != OutputMode::Quiet {
                    println!(
                        "{} session written to {}",
                        "Exported:".green(),
                        destination.display()
                    );
                }
                Ok(())
            }

            Commands::ImportSession { file, save, name } => {
                let document = portable::import_file(&file)?;
                if mode != OutputMode::Quiet {
                    println!(
                        "Read session \"{}\": {} video{}, {} root{}",
                        document.name,
                        document.records.len(),
                        if document.records.len() == 1 { "" } else { "s" },
                        document.roots.len(),
                        if document.roots.len() == 1 { "" } else { "s" },
                    );
                }
                if save {
                    let session_name = name
                        .or_else(|| {
                            (!document.name.is_empty()).then(|| document.name.clone())
                        })
                        .unwrap_or_else(|| "Imported session".to_string());
                    let session = store.create(
                        &session_name,
                        dedup_roots(document.roots),
                        document.records,
                    )?;
                    if mode != OutputMode::Quiet {
                        println!(
                            "{} session \"{}\" saved as {}",
                            "Saved:".green(),
                            session.name,
                            session.id
                        );
                    }
                }
                Ok(())
            }
        }
    }
}

/// Canonicalize and validate user-supplied scan roots.
fn canonical_roots(paths: &[PathBuf]) -> Result<Vec<String>> {
    let mut roots = Vec::new();
    for path in paths {
        let canonical = fs::canonicalize(path)
            .with_context(|| format!("cannot access {}", path.display()))?;
        if !canonical.is_dir() {
            bail!("not a directory: {}", path.display());
        }
        roots.push(canonical.display().to_string());
    }
    Ok(dedup_roots(roots))
}

/// Walk the roots and collect metadata, driving a progress bar.
fn scan_catalog(roots: &[String], mode: OutputMode) -> Vec<CatalogRecord> {
    let root_paths: Vec<PathBuf> = roots.iter().map(PathBuf::from).collect();

    let spinner =
        (mode != OutputMode::Quiet).then(|| progress::scan_spinner("Scanning directories..."));
    let paths = scanner::scan_roots(&root_paths, mode);
    if let Some(spinner) = &spinner {
        progress::finish_and_clear(spinner);
    }
    if paths.is_empty() {
        return Vec::new();
    }

    let bar = (mode != OutputMode::Quiet).then(|| progress::file_progress_bar(paths.len() as u64));
    let records = metadata::collect_metadata(&paths, |event| {
        if let Some(bar) = &bar {
            bar.set_position(event.processed as u64);
            bar.set_message(event.current_file.clone());
        }
    });
    if let Some(bar) = &bar {
        progress::finish_and_clear(bar);
    }
    records
}

/// Surface per-file metadata failures as a non-fatal summary.
fn report_failures(records: &[CatalogRecord], mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }
    let failed = records.iter().filter(|r| r.failed).count();
    if failed > 0 {
        eprintln!(
            "{} {failed} file{} could not be fully read; included with best-effort metadata",
            "Warning:".yellow(),
            if failed == 1 { "" } else { "s" }
        );
    }
}

fn show_session(session: &Session, json: bool, mode: OutputMode) -> Result<()> {
    if json {
        output::print_json(session)?;
    } else {
        output::print_session(session, mode);
    }
    Ok(())
}

fn default_session_filename(session: &Session) -> String {
    if session.name.is_empty() {
        format!("{}.json", session.id)
    } else {
        format!("{}.json", session.name.replace(['/', '\\'], "_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_args_are_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_canonical_roots_rejects_files() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.mp4");
        fs::write(&file, b"x").unwrap();
        assert!(canonical_roots(&[file]).is_err());
        assert!(canonical_roots(&[dir.path().to_path_buf()]).is_ok());
    }

    #[test]
    fn test_canonical_roots_rejects_missing_paths() {
        assert!(canonical_roots(&[PathBuf::from("/no/such/dir")]).is_err());
    }

    #[test]
    fn test_canonical_roots_dedupes() {
        let dir = TempDir::new().unwrap();
        let roots =
            canonical_roots(&[dir.path().to_path_buf(), dir.path().to_path_buf()]).unwrap();
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn test_default_session_filename_sanitizes_name() {
        let mut session = Session::new("a/b\\c", Vec::new(), Vec::new());
        assert_eq!(default_session_filename(&session), "a_b_c.json");
        session.name.clear();
        assert_eq!(
            default_session_filename(&session),
            format!("{}.json", session.id)
        );
    }
}
