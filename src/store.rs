//! Durable session storage
//!
//! One JSON file per session named by its id, plus a reserved
//! `last-session.json` holding a copy of the most recently touched
//! session. Writes are whole-file overwrites; there is no locking, a
//! single writer at a time is assumed.

use crate::model::{CatalogRecord, Session, SessionSummary};
use chrono::Utc;
use colored::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reserved file name for the last-touched-session pointer
pub const LAST_SESSION_FILE: &str = "last-session.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("no previous session")]
    NoLastSession,
    #[error("session store I/O failure: {0}")]
    Storage(#[from] io::Error),
    #[error("corrupt session data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// File-backed store keyed by session id.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        Ok(SessionStore {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn session_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn last_session_path(&self) -> PathBuf {
        self.dir.join(LAST_SESSION_FILE)
    }

    /// Persist a brand new session and point the last-session slot at it.
    pub fn create(
        &self,
        name: &str,
        roots: Vec<String>,
        records: Vec<CatalogRecord>,
    ) -> Result<Session, StoreError> {
        let session = Session::new(name, roots, records);
        self.write_session(&session)?;
        self.mark_last(&session)?;
        Ok(session)
    }

    /// Read a stored session by id.
    pub fn get(&self, id: &str) -> Result<Session, StoreError> {
        let text = match fs::read_to_string(self.session_path(id)) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    /// Summaries of every stored session, most recently updated first.
    ///
    /// A session file that fails to parse is skipped with a warning rather
    /// than failing the whole listing.
    pub fn list(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(_) => continue,
            };
            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !file_name.ends_with(".json") || file_name == LAST_SESSION_FILE {
                continue;
            }
            match read_session_file(&path) {
                Ok(session) => summaries.push(SessionSummary::of(&session)),
                Err(err) => {
                    eprintln!(
                        "{} skipping unreadable session file {}: {}",
                        "Warning:".yellow(),
                        path.display(),
                        err
                    );
                }
            }
        }
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    /// Replace a session's roots and records, keeping id and `created_at`.
    pub fn update(
        &self,
        id: &str,
        roots: Vec<String>,
        records: Vec<CatalogRecord>,
    ) -> Result<Session, StoreError> {
        let mut session = self.get(id)?;
        session.roots = crate::model::dedup_roots(roots);
        session.records = records;
        session.updated_at = Utc::now();
        self.write_session(&session)?;
        self.mark_last(&session)?;
        Ok(session)
    }

    /// Remove a stored session. The last-session pointer is left untouched
    /// even if it referenced the deleted id.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.session_path(id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// The most recently touched session, if any was ever saved.
    pub fn load_last(&self) -> Result<Session, StoreError> {
        let text = match fs::read_to_string(self.last_session_path()) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NoLastSession)
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    /// Point the last-session slot at `session`. Called on create, load
    /// and update.
    pub fn mark_last(&self, session: &Session) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(session)?;
        fs::write(self.last_session_path(), json)?;
        Ok(())
    }

    fn write_session(&self, session: &Session) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(session)?;
        fs::write(self.session_path(&session.id), json)?;
        Ok(())
    }
}

fn read_session_file(path: &Path) -> Result<Session, StoreError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
