//! Per-file metadata collection in bounded concurrent batches

use crate::classify::normalized_extension;
use crate::model::{CatalogRecord, NOT_AVAILABLE};
use crate::scan_events::ScanProgress;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Paths processed concurrently per batch. Bounds peak open file handles
/// while still overlapping stat latency.
pub const BATCH_SIZE: usize = 5;

/// Build one catalog record per candidate path.
///
/// Every path yields exactly one record: on a metadata failure the record
/// is emitted with best-effort size (or all zeroes) and `failed = true`,
/// never dropped. Records come back in input order.
///
/// Batches of [`BATCH_SIZE`] are dispatched concurrently; the next batch
/// starts only once the previous one fully completed. `on_progress` fires
/// after each file, from worker threads, in completion order.
pub fn collect_metadata<F>(paths: &[PathBuf], on_progress: F) -> Vec<CatalogRecord>
where
    F: Fn(ScanProgress) + Sync,
{
    let total = paths.len();
    let processed = AtomicUsize::new(0);
    let mut records = Vec::with_capacity(total);

    for batch in paths.chunks(BATCH_SIZE) {
        let batch_records: Vec<CatalogRecord> = batch
            .par_iter()
            .map(|path| {
                let (record, error) = match read_record(path) {
                    Ok(record) => (record, None),
                    Err(err) => (fallback_record(path), Some(err.to_string())),
                };
                let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
                on_progress(ScanProgress {
                    processed: done,
                    total,
                    current_file: record.name.clone(),
                    succeeded: !record.failed,
                    error,
                });
                record
            })
            .collect();
        records.extend(batch_records);
    }

    records
}

/// Two-decimal megabyte display derived from a byte count.
pub fn size_display_mb(size_bytes: u64) -> String {
    format!("{:.2} MB", size_bytes as f64 / (1024.0 * 1024.0))
}

fn read_record(path: &Path) -> io::Result<CatalogRecord> {
    let meta = fs::metadata(path)?;
    let size_bytes = meta.len();
    Ok(record_with(path, size_bytes, size_display_mb(size_bytes), false))
}

/// Minimal stat-only retry after a failure; zeroed when even the stat fails.
fn fallback_record(path: &Path) -> CatalogRecord {
    match fs::metadata(path) {
        Ok(meta) => record_with(path, meta.len(), size_display_mb(meta.len()), true),
        Err(_) => record_with(path, 0, NOT_AVAILABLE.to_string(), true),
    }
}

fn record_with(path: &Path, size_bytes: u64, size_display: String, failed: bool) -> CatalogRecord {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    CatalogRecord {
        name: name.clone(),
        absolute_path: path.display().to_string(),
        relative_path: relative_display(path),
        extension: normalized_extension(&name),
        size_bytes,
        size_display,
        duration_display: NOT_AVAILABLE.to_string(),
        video_codec: NOT_AVAILABLE.to_string(),
        audio_codec: NOT_AVAILABLE.to_string(),
        folder: path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        failed,
    }
}

/// `./`-prefixed forward-slash path relative to the working directory.
///
/// Best effort: when the path is not under the working directory (or the
/// working directory is unavailable) this falls back to the absolute path.
fn relative_display(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).map(|p| p.to_path_buf()).ok());
    match relative {
        Some(rel) => format!("./{}", rel.display().to_string().replace('\\', "/")),
        None => path.display().to_string(),
    }
}
