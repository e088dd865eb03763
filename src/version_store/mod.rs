//! # Version Store
//!
//! Upserts a unit's document and rolls history on content change.
//!
//! - Missing key: a shell document (`current = null`, `history = []`) is
//!   created first.
//! - Byte-identical source: no write at all.
//! - Otherwise the previous `current` moves to the front of `history`, a
//!   new `current` is stamped, and the whole document is saved in one write.

use uuid::Uuid;

use crate::document::{DocumentKey, QualifiedName, Revision, VersionedDocument};
use crate::observability::{log_event_with_fields, Event};
use crate::store::{DocumentStore, StoreError, StoreResult};

/// Result of a push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Source matched the current version; nothing was written
    Unchanged,
    /// A new current version was written
    Updated(Uuid),
}

/// Writer side of the versioned document model
#[derive(Debug, Clone, Copy)]
pub struct VersionStore<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> VersionStore<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Push `source` as the current version of `name` in `namespace`
    pub fn push(
        &self,
        namespace: &str,
        name: &QualifiedName,
        source: &str,
    ) -> StoreResult<PushOutcome> {
        let key = DocumentKey::bare(name);
        let mut doc = self.fetch_or_create(namespace, &key)?;

        match doc.revise(source) {
            Revision::Unchanged => {
                log_event_with_fields(
                    Event::UnitUnchanged,
                    &[("name", name.as_str()), ("namespace", namespace)],
                );
                Ok(PushOutcome::Unchanged)
            }
            Revision::Updated {
                version_id,
                archived,
            } => {
                if let Some(archived) = archived {
                    log_event_with_fields(
                        Event::VersionArchived,
                        &[
                            ("name", name.as_str()),
                            ("namespace", namespace),
                            ("version_id", archived.to_string().as_str()),
                        ],
                    );
                }

                self.store.save(namespace, &doc)?;

                log_event_with_fields(
                    Event::UnitPushed,
                    &[
                        ("name", name.as_str()),
                        ("namespace", namespace),
                        ("version_id", version_id.to_string().as_str()),
                    ],
                );
                Ok(PushOutcome::Updated(version_id))
            }
        }
    }

    fn fetch_or_create(&self, namespace: &str, key: &DocumentKey) -> StoreResult<VersionedDocument> {
        if let Some(doc) = self.store.fetch(namespace, key)? {
            return Ok(doc);
        }

        match self.store.create(namespace, &VersionedDocument::shell(key)) {
            Ok(doc) => Ok(doc),
            // Another writer created it between our fetch and create
            Err(StoreError::Conflict { .. }) => self.store.fetch(namespace, key)?.ok_or_else(|| {
                StoreError::Protocol(format!("{} reported as existing but not found", key))
            }),
            Err(e) => Err(e),
        }
    }
}
