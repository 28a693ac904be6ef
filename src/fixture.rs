//! Append-only fixture log shared across runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One registered user, as written by a signup run and replayed by a
/// login run. Serialized with camelCase keys; absent optional fields
/// are omitted from the JSON entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureRecord {
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// File-backed log of fixture records, stored as one JSON array.
///
/// The log is append-only: records accumulate across runs and nothing
/// here ever truncates the file. The file and its parent directory are
/// created lazily on the first append, so a fresh checkout works
/// without setup.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    path: PathBuf,
}

impl FixtureStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record to the log, preserving everything already there.
    pub fn append(&self, record: &FixtureRecord) -> Result<()> {
        let mut log = self.load_log()?;
        log.push(record.clone());
        self.write_log(&log)?;
        tracing::debug!(path = %self.path.display(), total = log.len(), "fixture appended");
        Ok(())
    }

    /// Read the most recently appended record.
    pub fn read_last(&self) -> Result<FixtureRecord> {
        let mut log = self.load_log()?;
        log.pop().ok_or_else(|| Error::EmptyFixtureLog {
            path: self.path.clone(),
        })
    }

    /// Number of records currently in the log.
    pub fn len(&self) -> Result<usize> {
        Ok(self.load_log()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Load the whole array. An absent or blank file reads as empty;
    /// anything unparseable is a structured error, never a panic.
    fn load_log(&self) -> Result<Vec<FixtureRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| Error::FixtureLog {
            path: self.path.clone(),
            message: format!("cannot read: {}", e),
        })?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| Error::FixtureLog {
            path: self.path.clone(),
            message: format!("malformed JSON array: {}", e),
        })
    }

    /// Rewrite the file through a sibling temp file and rename, so a
    /// crash mid-write can never leave a half-written log behind.
    fn write_log(&self, log: &[FixtureRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::FixtureLog {
                    path: self.path.clone(),
                    message: format!("cannot create {}: {}", parent.display(), e),
                })?;
            }
        }
        let json = serde_json::to_string_pretty(log).map_err(|e| Error::FixtureLog {
            path: self.path.clone(),
            message: format!("cannot serialize: {}", e),
        })?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).map_err(|e| Error::FixtureLog {
            path: self.path.clone(),
            message: format!("cannot write {}: {}", tmp.display(), e),
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| Error::FixtureLog {
            path: self.path.clone(),
            message: format!("cannot replace with {}: {}", tmp.display(), e),
        })
    }
}
