//! Sync run report

use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

/// A unit whose current version changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncedUnit {
    pub name: String,
    pub namespace: String,
    pub version_id: Uuid,
}

/// Why an entry was left alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The computed namespace is not in the snapshot
    NoNamespace(String),
    /// Path does not form a valid qualified name
    InvalidName(String),
    /// File could not be read as UTF-8 text
    Unreadable(String),
    /// Directory walk failed at this entry
    Walk(String),
}

/// An entry or subtree the walker skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub path: PathBuf,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Everything one sync run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub updated: Vec<SyncedUnit>,
    pub unchanged: Vec<String>,
    /// Units another writer updated while this run was pushing them
    pub conflicts: Vec<String>,
    pub skipped: Vec<SkippedEntry>,
}

impl SyncReport {
    /// Number of files that reached the version store
    pub fn pushed(&self) -> usize {
        self.updated.len() + self.unchanged.len() + self.conflicts.len()
    }

    pub(crate) fn skip(&mut self, path: impl Into<PathBuf>, reason: SkipReason) {
        self.skipped.push(SkippedEntry {
            path: path.into(),
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_serialization() {
        let mut report = SyncReport::default();
        report.skip("other", SkipReason::NoNamespace("pyc_other".to_string()));

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["skipped"][0]["path"], "other");
        assert_eq!(value["skipped"][0]["reason"], "no_namespace");
        assert_eq!(value["skipped"][0]["detail"], "pyc_other");
    }

    #[test]
    fn test_pushed_count() {
        let mut report = SyncReport::default();
        report.unchanged.push("a.b".to_string());
        report.conflicts.push("a.c".to_string());
        assert_eq!(report.pushed(), 2);
    }
}
