//! Catalog and session data model
//!
//! Field names on disk are camelCase to stay compatible with existing
//! session files; see the serde renames on each type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// Placeholder for metadata this tool does not probe (duration, codecs)
pub const NOT_AVAILABLE: &str = "N/A";

/// One scanned video file.
///
/// `absolute_path` is the identity key: unique within a catalog, and the
/// key the merge engine deduplicates on.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    /// Display filename (base name with extension)
    pub name: String,
    /// Canonical filesystem path; identity key
    pub absolute_path: String,
    /// `./`-prefixed path relative to the working directory, forward
    /// slashes; falls back to the absolute path when not computable
    pub relative_path: String,
    /// Lower-cased extension with leading dot, empty if none
    pub extension: String,
    /// File size in bytes; 0 if unreadable
    pub size_bytes: u64,
    /// Human size string ("12.34 MB"), derived once at scan time
    pub size_display: String,
    /// Always "N/A" (no media probing)
    pub duration_display: String,
    /// Always "N/A"
    pub video_codec: String,
    /// Always "N/A"
    pub audio_codec: String,
    /// Absolute parent directory path
    pub folder: String,
    /// True if metadata extraction errored for this file
    pub failed: bool,
}

/// A named, persisted catalog plus the roots it was scanned from.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque id, assigned at creation, never regenerated
    pub id: String,
    /// User-supplied label, not guaranteed unique
    pub name: String,
    /// Root directories scanned to build this session, deduplicated
    pub roots: Vec<String>,
    /// The catalog
    pub records: Vec<CatalogRecord>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Bumped on every create/update
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Build a fresh session with a new time-derived id.
    pub fn new(name: &str, roots: Vec<String>, records: Vec<CatalogRecord>) -> Self {
        let now = Utc::now();
        Session {
            id: new_session_id(),
            name: name.to_string(),
            roots: dedup_roots(roots),
            records,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn total_size_bytes(&self) -> u64 {
        total_size_bytes(&self.records)
    }
}

/// Listing entry for a stored session.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub record_count: usize,
    pub total_size_bytes: u64,
}

impl SessionSummary {
    pub fn of(session: &Session) -> Self {
        SessionSummary {
            id: session.id.clone(),
            name: session.name.clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
            record_count: session.records.len(),
            total_size_bytes: session.total_size_bytes(),
        }
    }
}

/// Time-derived session id, e.g. `session_1724457600123`.
///
/// Strictly increasing within a process so that back-to-back creates in
/// the same millisecond cannot collide.
pub fn new_session_id() -> String {
    static LAST_ID: AtomicI64 = AtomicI64::new(0);
    let now = Utc::now().timestamp_millis();
    let prev = LAST_ID
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
            Some(now.max(prev + 1))
        })
        .unwrap_or(0);
    format!("session_{}", now.max(prev + 1))
}

/// Sum of record sizes in bytes.
pub fn total_size_bytes(records: &[CatalogRecord]) -> u64 {
    records.iter().map(|r| r.size_bytes).sum()
}

/// Deduplicate roots preserving first-occurrence order.
pub fn dedup_roots(roots: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(roots.len());
    for root in roots {
        if !out.contains(&root) {
            out.push(root);
        }
    }
    out
}

/// Test fixture shared by other modules' tests.
#[cfg(test)]
pub(crate) fn test_record(path: &str, size: u64) -> CatalogRecord {
    let name = path.rsplit('/').next().unwrap_or(path).to_string();
    CatalogRecord {
        name: name.clone(),
        absolute_path: path.to_string(),
        relative_path: format!("./{}", name),
        extension: ".mp4".to_string(),
        size_bytes: size,
        size_display: format!("{:.2} MB", size as f64 / (1024.0 * 1024.0)),
        duration_display: NOT_AVAILABLE.to_string(),
        video_codec: NOT_AVAILABLE.to_string(),
        audio_codec: NOT_AVAILABLE.to_string(),
        folder: "/videos".to_string(),
        failed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::test_record as record;

    #[test]
    fn test_session_new_assigns_id_and_timestamps() {
        let session = Session::new("movies", vec!["/videos".into()], vec![record("/videos/a.mp4", 10)]);
        assert!(session.id.starts_with("session_"));
        assert_eq!(session.created_at, session.updated_at);
        assert_eq!(session.roots, vec!["/videos".to_string()]);
    }

    #[test]
    fn test_dedup_roots_keeps_first_occurrence_order() {
        let roots = vec![
            "/a".to_string(),
            "/b".to_string(),
            "/a".to_string(),
            "/c".to_string(),
            "/b".to_string(),
        ];
        assert_eq!(dedup_roots(roots), vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_total_size_bytes() {
        let records = vec![record("/videos/a.mp4", 1000), record("/videos/b.mp4", 500)];
        assert_eq!(total_size_bytes(&records), 1500);
    }

    #[test]
    fn test_record_wire_field_names() {
        let json = serde_json::to_value(record("/videos/a.mp4", 42)).unwrap();
        assert!(json.get("absolutePath").is_some());
        assert!(json.get("relativePath").is_some());
        assert!(json.get("sizeBytes").is_some());
        assert!(json.get("sizeDisplay").is_some());
        assert!(json.get("durationDisplay").is_some());
        assert!(json.get("videoCodec").is_some());
        assert!(json.get("audioCodec").is_some());
        assert!(json.get("failed").is_some());
    }

    #[test]
    fn test_session_wire_field_names() {
        let session = Session::new("movies", vec!["/videos".into()], Vec::new());
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("roots").is_some());
        assert!(json.get("records").is_some());
    }
}
