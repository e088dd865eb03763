//! # In-Memory Store
//!
//! Namespaces hold documents keyed by document key. Revision tokens are
//! `<generation>-<uuid>` and are checked on every save. Access counters
//! let callers observe how many round trips an operation made.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use uuid::Uuid;

use crate::document::{DocumentKey, VersionedDocument};

use super::backend::DocumentStore;
use super::errors::{StoreError, StoreResult};

/// Point-in-time copy of the access counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub namespace_listings: u64,
    pub fetches: u64,
    pub creates: u64,
    pub saves: u64,
}

impl StoreStats {
    /// Document-level calls of any kind
    pub fn document_calls(&self) -> u64 {
        self.fetches + self.creates + self.saves
    }

    /// Writes of any kind
    pub fn writes(&self) -> u64 {
        self.creates + self.saves
    }
}

#[derive(Debug, Default)]
struct Counters {
    namespace_listings: AtomicU64,
    fetches: AtomicU64,
    creates: AtomicU64,
    saves: AtomicU64,
}

type Namespace = BTreeMap<String, VersionedDocument>;

/// In-memory document store for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    namespaces: RwLock<BTreeMap<String, Namespace>>,
    counters: Counters,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with empty namespaces
    pub fn with_namespaces<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        for name in names {
            store.create_namespace(name);
        }
        store
    }

    /// Create an empty namespace; existing namespaces are left alone
    pub fn create_namespace(&self, name: impl Into<String>) {
        self.namespaces
            .write()
            .unwrap()
            .entry(name.into())
            .or_default();
    }

    /// Snapshot of the access counters
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            namespace_listings: self.counters.namespace_listings.load(Ordering::Relaxed),
            fetches: self.counters.fetches.load(Ordering::Relaxed),
            creates: self.counters.creates.load(Ordering::Relaxed),
            saves: self.counters.saves.load(Ordering::Relaxed),
        }
    }

    /// Number of documents in a namespace, `None` if it does not exist
    pub fn document_count(&self, namespace: &str) -> Option<usize> {
        self.namespaces.read().unwrap().get(namespace).map(|ns| ns.len())
    }

    fn next_revision(previous: Option<&str>) -> String {
        let generation = previous
            .and_then(|rev| rev.split('-').next())
            .and_then(|g| g.parse::<u64>().ok())
            .unwrap_or(0);
        format!("{}-{}", generation + 1, Uuid::new_v4().simple())
    }
}

impl DocumentStore for MemoryStore {
    fn list_namespaces(&self) -> StoreResult<Vec<String>> {
        self.counters.namespace_listings.fetch_add(1, Ordering::Relaxed);
        Ok(self.namespaces.read().unwrap().keys().cloned().collect())
    }

    fn fetch(&self, namespace: &str, key: &DocumentKey) -> StoreResult<Option<VersionedDocument>> {
        self.counters.fetches.fetch_add(1, Ordering::Relaxed);
        let namespaces = self.namespaces.read().unwrap();
        let ns = namespaces
            .get(namespace)
            .ok_or_else(|| StoreError::NamespaceNotFound(namespace.to_string()))?;
        Ok(ns.get(key.as_str()).cloned())
    }

    fn create(&self, namespace: &str, doc: &VersionedDocument) -> StoreResult<VersionedDocument> {
        self.counters.creates.fetch_add(1, Ordering::Relaxed);
        let mut namespaces = self.namespaces.write().unwrap();
        let ns = namespaces
            .get_mut(namespace)
            .ok_or_else(|| StoreError::NamespaceNotFound(namespace.to_string()))?;

        if ns.contains_key(&doc.id) {
            return Err(StoreError::Conflict {
                namespace: namespace.to_string(),
                key: doc.id.clone(),
            });
        }

        let mut stored = doc.clone();
        stored.revision = Some(Self::next_revision(None));
        ns.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    fn save(&self, namespace: &str, doc: &VersionedDocument) -> StoreResult<VersionedDocument> {
        self.counters.saves.fetch_add(1, Ordering::Relaxed);
        let mut namespaces = self.namespaces.write().unwrap();
        let ns = namespaces
            .get_mut(namespace)
            .ok_or_else(|| StoreError::NamespaceNotFound(namespace.to_string()))?;

        let existing_rev = ns.get(&doc.id).and_then(|d| d.revision.clone());
        if existing_rev != doc.revision {
            return Err(StoreError::Conflict {
                namespace: namespace.to_string(),
                key: doc.id.clone(),
            });
        }

        let mut stored = doc.clone();
        stored.revision = Some(Self::next_revision(existing_rev.as_deref()));
        ns.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }
}
