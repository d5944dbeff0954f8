//! Portable session files (user-facing export/import)
//!
//! Distinct from the internal store: a single versioned JSON document a
//! user can move between machines. Import validates the document before
//! anything is applied; an invalid file is rejected wholesale.

use crate::model::{CatalogRecord, Session};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Version stamp written into every exported document
pub const FORMAT_VERSION: &str = "2.0.0";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid session file: {0}")]
    Validation(String),
    #[error("could not read session file: {0}")]
    Io(#[from] std::io::Error),
}

/// The portable document. Only `records` is mandatory on import; the
/// remaining fields default so older or hand-edited files still load.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionExport {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roots: Vec<String>,
    pub records: Vec<CatalogRecord>,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub record_count: usize,
    #[serde(default)]
    pub format_version: String,
}

/// Build the portable document for a session.
pub fn export_document(session: &Session) -> SessionExport {
    SessionExport {
        name: session.name.clone(),
        roots: session.roots.clone(),
        records: session.records.clone(),
        exported_at: Some(Utc::now()),
        record_count: session.records.len(),
        format_version: FORMAT_VERSION.to_string(),
    }
}

pub fn to_json(document: &SessionExport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(document)
}

/// Parse and validate a portable document.
///
/// `records` must be present and array-shaped; anything else fails with a
/// descriptive validation error and nothing is applied.
pub fn parse_import(text: &str) -> Result<SessionExport, ImportError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|err| ImportError::Validation(format!("not valid JSON: {err}")))?;

    match value.get("records") {
        None => {
            return Err(ImportError::Validation(
                "missing 'records' field".to_string(),
            ))
        }
        Some(records) if !records.is_array() => {
            return Err(ImportError::Validation(
                "'records' must be an array".to_string(),
            ))
        }
        Some(_) => {}
    }

    serde_json::from_value(value)
        .map_err(|err| ImportError::Validation(format!("malformed session document: {err}")))
}

/// Read and validate a portable session file from disk.
pub fn import_file(path: &Path) -> Result<SessionExport, ImportError> {
    let text = fs::read_to_string(path)?;
    parse_import(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_record;

    fn session() -> Session {
        Session::new(
            "movies",
            vec!["/videos".into(), "/archive".into()],
            vec![
                test_record("/videos/a.mp4", 1000),
                test_record("/archive/b.mkv", 2000),
            ],
        )
    }

    #[test]
    fn test_round_trip_preserves_records_and_roots() {
        let session = session();
        let json = to_json(&export_document(&session)).unwrap();
        let imported = parse_import(&json).unwrap();

        assert_eq!(imported.name, session.name);
        assert_eq!(imported.roots, session.roots);
        assert_eq!(imported.records, session.records);
        assert_eq!(imported.record_count, 2);
        assert_eq!(imported.format_version, FORMAT_VERSION);
    }

    #[test]
    fn test_import_rejects_missing_records() {
        let err = parse_import(r#"{"name": "x", "roots": []}"#).unwrap_err();
        match err {
            ImportError::Validation(msg) => assert!(msg.contains("records")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_import_rejects_non_array_records() {
        let err = parse_import(r#"{"name": "x", "records": "lots"}"#).unwrap_err();
        match err {
            ImportError::Validation(msg) => assert!(msg.contains("array")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_import_rejects_invalid_json() {
        assert!(matches!(
            parse_import("not json at all"),
            Err(ImportError::Validation(_))
        ));
    }

    #[test]
    fn test_import_tolerates_missing_optional_fields() {
        let imported = parse_import(r#"{"records": []}"#).unwrap();
        assert_eq!(imported.name, "");
        assert!(imported.roots.is_empty());
        assert!(imported.records.is_empty());
        assert!(imported.exported_at.is_none());
    }

    #[test]
    fn test_export_wire_field_names() {
        let json = serde_json::to_value(export_document(&session())).unwrap();
        assert!(json.get("exportedAt").is_some());
        assert!(json.get("recordCount").is_some());
        assert!(json.get("formatVersion").is_some());
        assert!(json.get("records").is_some());
        assert!(json.get("roots").is_some());
    }
}
