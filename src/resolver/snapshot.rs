//! Cached copy of the store's namespace list
//!
//! Refreshed only at connect time and on explicit invalidation, so a
//! namespace created afterwards stays invisible until then.

use std::collections::BTreeSet;

use crate::observability::{log_event_with_fields, Event};
use crate::store::{DocumentStore, StoreResult};

/// Process-scoped namespace set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceSnapshot {
    names: BTreeSet<String>,
}

impl NamespaceSnapshot {
    /// Snapshot holding exactly the given names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// List namespaces from the store
    pub fn fetch(store: &dyn DocumentStore) -> StoreResult<Self> {
        let snapshot = Self::from_names(store.list_namespaces()?);
        log_event_with_fields(
            Event::NamespacesRefreshed,
            &[("count", snapshot.len().to_string().as_str())],
        );
        Ok(snapshot)
    }

    /// Replace the contents with a fresh listing
    pub fn refresh(&mut self, store: &dyn DocumentStore) -> StoreResult<()> {
        *self = Self::fetch(store)?;
        Ok(())
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.names.contains(namespace)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
