//! Versioned document model and archival rule
//!
//! A document holds at most one live version (`current`) and an
//! append-only log of superseded versions (`history`, newest first).
//! `history` never contains the live value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::key::DocumentKey;

/// One pushed version of a unit's source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    /// When the version was pushed (UTC)
    pub created_at: DateTime<Utc>,
    /// Globally unique version identifier
    pub version_id: Uuid,
    /// Full source text
    pub source: String,
}

impl VersionRecord {
    /// Fresh record stamped now with a new v4 id
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            created_at: Utc::now(),
            version_id: Uuid::new_v4(),
            source: source.into(),
        }
    }
}

/// Outcome of applying new source text to a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    /// Source is byte-identical to `current`; nothing changed
    Unchanged,
    /// `current` was replaced
    Updated {
        /// Id of the new current version
        version_id: Uuid,
        /// Id of the version moved into history, if there was one
        archived: Option<Uuid>,
    },
}

/// A unit's document as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedDocument {
    /// Document key
    #[serde(rename = "_id")]
    pub id: String,

    /// Store revision token, when the store hands one out
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    /// Live version, absent until the first real push
    #[serde(default)]
    pub current: Option<VersionRecord>,

    /// Former `current` values, newest first
    #[serde(default)]
    pub history: Vec<VersionRecord>,
}

impl VersionedDocument {
    /// Empty shell: no current version, no history
    pub fn shell(key: &DocumentKey) -> Self {
        Self {
            id: key.as_str().to_string(),
            revision: None,
            current: None,
            history: Vec::new(),
        }
    }

    /// The document key
    pub fn key(&self) -> DocumentKey {
        DocumentKey::from_raw(self.id.clone())
    }

    /// True if the document never received a real push
    pub fn is_shell(&self) -> bool {
        self.current.is_none()
    }

    /// Source text of the live version
    pub fn current_source(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.source.as_str())
    }

    /// Apply new source text.
    ///
    /// Byte-identical source leaves the document untouched. Otherwise the
    /// live version, if any, moves to the front of `history` and a freshly
    /// stamped record becomes current.
    pub fn revise(&mut self, source: &str) -> Revision {
        if self.current_source() == Some(source) {
            return Revision::Unchanged;
        }
        self.install(VersionRecord::new(source))
    }

    fn install(&mut self, record: VersionRecord) -> Revision {
        let version_id = record.version_id;
        let archived = self.current.take().map(|previous| {
            let id = previous.version_id;
            self.history.insert(0, previous);
            id
        });
        self.current = Some(record);

        Revision::Updated {
            version_id,
            archived,
        }
    }

    /// Every version, live one first, then history newest first
    pub fn versions(&self) -> impl Iterator<Item = &VersionRecord> {
        self.current.iter().chain(self.history.iter())
    }
}
