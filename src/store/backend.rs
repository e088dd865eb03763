//! # Document Store Trait

use crate::document::{DocumentKey, VersionedDocument};

use super::errors::StoreResult;

/// Backend trait for the namespace/document store.
///
/// Every call blocks until the store answers. Namespaces are never
/// created through this trait.
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// List every namespace the store holds
    fn list_namespaces(&self) -> StoreResult<Vec<String>>;

    /// Fetch a document, `None` if the key does not exist
    fn fetch(&self, namespace: &str, key: &DocumentKey) -> StoreResult<Option<VersionedDocument>>;

    /// Create a new document; fails with `Conflict` if the key exists.
    ///
    /// Returns the document carrying its new revision token.
    fn create(&self, namespace: &str, doc: &VersionedDocument) -> StoreResult<VersionedDocument>;

    /// Persist the whole document.
    ///
    /// A stale revision token fails with `Conflict` and writes nothing.
    fn save(&self, namespace: &str, doc: &VersionedDocument) -> StoreResult<VersionedDocument>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
    fn list_namespaces(&self) -> StoreResult<Vec<String>> {
        (**self).list_namespaces()
    }

    fn fetch(&self, namespace: &str, key: &DocumentKey) -> StoreResult<Option<VersionedDocument>> {
        (**self).fetch(namespace, key)
    }

    fn create(&self, namespace: &str, doc: &VersionedDocument) -> StoreResult<VersionedDocument> {
        (**self).create(namespace, doc)
    }

    fn save(&self, namespace: &str, doc: &VersionedDocument) -> StoreResult<VersionedDocument> {
        (**self).save(namespace, doc)
    }
}
