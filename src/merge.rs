//! Add-roots merge flow
//!
//! Combines an existing session's catalog with freshly scanned roots,
//! deduplicating on absolute path. The session's own roots are re-scanned
//! first so the baseline reflects the current filesystem state rather than
//! stale stored records; the duplicate reporting below depends on that
//! fresh baseline.

use crate::metadata::collect_metadata;
use crate::model::{dedup_roots, CatalogRecord, Session};
use crate::output::OutputMode;
use crate::scan_events::ScanProgress;
use crate::scanner::scan_roots;
use crate::store::{SessionStore, StoreError};
use std::collections::HashSet;
use std::path::PathBuf;

/// Incoming records split against an existing catalog.
#[derive(Debug)]
pub struct MergePartition {
    /// Records whose absolute path was not in the existing catalog
    pub new: Vec<CatalogRecord>,
    /// Records already present, dropped from the merge
    pub duplicates: Vec<CatalogRecord>,
}

/// Outcome of an add-roots operation.
#[derive(Debug)]
pub enum MergeOutcome {
    /// The new roots contained no video files at all; nothing persisted.
    NothingFound,
    /// Everything found was already in the session; nothing persisted.
    AllDuplicates { duplicate_count: usize },
    /// New records were merged in and the session persisted.
    Merged {
        session: Session,
        merged_count: usize,
        new_count: usize,
        duplicate_count: usize,
    },
}

/// Split `incoming` into records new to `existing` and duplicates,
/// keyed on absolute path. Preserves `incoming` order in both halves.
pub fn partition_incoming(
    existing: &[CatalogRecord],
    incoming: Vec<CatalogRecord>,
) -> MergePartition {
    let known: HashSet<&str> = existing.iter().map(|r| r.absolute_path.as_str()).collect();
    let (duplicates, new): (Vec<_>, Vec<_>) = incoming
        .into_iter()
        .partition(|record| known.contains(record.absolute_path.as_str()));
    MergePartition { new, duplicates }
}

/// Scan `new_roots` into an existing session.
///
/// Re-scans the session's current roots for a fresh baseline, scans the
/// new roots, and persists the deduplicated union only when it actually
/// grew the catalog. Merging the same roots twice is idempotent: the
/// second application reports duplicates and leaves the store untouched.
pub fn add_roots<F>(
    store: &SessionStore,
    session: &Session,
    new_roots: &[String],
    mode: OutputMode,
    on_progress: F,
) -> Result<MergeOutcome, StoreError>
where
    F: Fn(ScanProgress) + Sync,
{
    let existing_paths = scan_roots(&to_path_bufs(&session.roots), mode);
    let existing = collect_metadata(&existing_paths, &on_progress);

    let incoming_paths = scan_roots(&to_path_bufs(new_roots), mode);
    let incoming = collect_metadata(&incoming_paths, &on_progress);

    let MergePartition { new, duplicates } = partition_incoming(&existing, incoming);

    if new.is_empty() {
        return Ok(if duplicates.is_empty() {
            MergeOutcome::NothingFound
        } else {
            MergeOutcome::AllDuplicates {
                duplicate_count: duplicates.len(),
            }
        });
    }

    let new_count = new.len();
    let duplicate_count = duplicates.len();
    let mut merged = existing;
    merged.extend(new);
    let merged_count = merged.len();

    let mut roots = session.roots.clone();
    roots.extend(new_roots.iter().cloned());
    let session = store.update(&session.id, dedup_roots(roots), merged)?;

    Ok(MergeOutcome::Merged {
        session,
        merged_count,
        new_count,
        duplicate_count,
    })
}

fn to_path_bufs(roots: &[String]) -> Vec<PathBuf> {
    roots.iter().map(PathBuf::from).collect()
}
