//! # Resolver
//!
//! Maps a qualified name to a store document.
//!
//! 1. A cached name is answered without touching the store.
//! 2. The top-level segment selects namespace `<prefix>_<segment>`; if the
//!    snapshot does not list it the answer is `NotFound` with no store call.
//! 3. Candidates are probed in fixed order: bare key, `.__init__`,
//!    `.__main__`. The first one that exists wins.
//! 4. A hit is cached under the requested name. A miss is not cached.
//!
//! `NotFound` is a normal answer; callers fall through to other finders.

mod cache;
mod snapshot;

pub use cache::ResolutionCache;
pub use snapshot::NamespaceSnapshot;

use crate::document::{DocumentKey, QualifiedName, VersionedDocument};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::store::{DocumentStore, StoreError, StoreResult};

/// A name bound to the document that answers it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUnit {
    /// Name as requested
    pub name: QualifiedName,
    /// Namespace the document lives in
    pub namespace: String,
    /// Winning candidate key
    pub key: DocumentKey,
    /// Document as fetched
    pub document: VersionedDocument,
    /// True iff the winning key is the package form
    pub is_package: bool,
}

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ResolvedUnit),
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn found(self) -> Option<ResolvedUnit> {
        match self {
            Resolution::Found(unit) => Some(unit),
            Resolution::NotFound => None,
        }
    }
}

/// Resolution state: namespace prefix, snapshot and cache
#[derive(Debug)]
pub struct Resolver {
    prefix: String,
    snapshot: NamespaceSnapshot,
    cache: ResolutionCache,
}

impl Resolver {
    pub fn new(prefix: impl Into<String>, snapshot: NamespaceSnapshot) -> Self {
        Self {
            prefix: prefix.into(),
            snapshot,
            cache: ResolutionCache::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn snapshot(&self) -> &NamespaceSnapshot {
        &self.snapshot
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Resolve a name against the store
    pub fn resolve(
        &mut self,
        store: &dyn DocumentStore,
        name: &QualifiedName,
    ) -> StoreResult<Resolution> {
        if let Some(unit) = self.cache.get(name.as_str()) {
            return Ok(Resolution::Found(unit.clone()));
        }

        let namespace = name.namespace(&self.prefix);
        if !self.snapshot.contains(&namespace) {
            return Ok(Resolution::NotFound);
        }

        for (key, _) in DocumentKey::candidates(name) {
            let fetched = match store.fetch(&namespace, &key) {
                Ok(doc) => doc,
                // Listed in the snapshot but dropped from the store since
                Err(StoreError::NamespaceNotFound(_)) => None,
                Err(e) => return Err(e),
            };

            if let Some(document) = fetched {
                let unit = ResolvedUnit {
                    name: name.clone(),
                    namespace: namespace.clone(),
                    is_package: key.is_package(),
                    key,
                    document,
                };
                log_event_with_fields(
                    Event::UnitResolved,
                    &[
                        ("name", name.as_str()),
                        ("namespace", namespace.as_str()),
                        ("key", unit.key.as_str()),
                        ("package", if unit.is_package { "true" } else { "false" }),
                    ],
                );
                self.cache.insert(unit.clone());
                return Ok(Resolution::Found(unit));
            }
        }

        log_event_with_fields(
            Event::UnitNotFound,
            &[("name", name.as_str()), ("namespace", namespace.as_str())],
        );
        Ok(Resolution::NotFound)
    }

    /// Clear the cache and re-list namespaces from the store.
    ///
    /// Mutates this resolver in place; calling it twice is harmless.
    pub fn invalidate(&mut self, store: &dyn DocumentStore) -> StoreResult<()> {
        self.cache.clear();
        self.snapshot.refresh(store)?;
        log_event(Event::CachesInvalidated);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::UnitKind;
    use crate::store::MemoryStore;

    fn name(s: &str) -> QualifiedName {
        QualifiedName::parse(s).unwrap()
    }

    fn put(store: &MemoryStore, namespace: &str, key: DocumentKey, source: &str) {
        let mut doc = store
            .create(namespace, &VersionedDocument::shell(&key))
            .unwrap();
        doc.revise(source);
        store.save(namespace, &doc).unwrap();
    }

    fn resolver_for(store: &MemoryStore) -> Resolver {
        Resolver::new("pyc", NamespaceSnapshot::fetch(store).unwrap())
    }

    #[test]
    fn test_resolves_plain_unit() {
        let store = MemoryStore::with_namespaces(["pyc_pkg"]);
        put(&store, "pyc_pkg", DocumentKey::bare(&name("pkg.util")), "X = 1");
        let mut resolver = resolver_for(&store);

        let unit = resolver.resolve(&store, &name("pkg.util")).unwrap().found().unwrap();
        assert_eq!(unit.namespace, "pyc_pkg");
        assert!(!unit.is_package);
        assert_eq!(unit.document.current_source(), Some("X = 1"));
    }

    #[test]
    fn test_package_flag_from_init_key() {
        let store = MemoryStore::with_namespaces(["pyc_pkg"]);
        put(
            &store,
            "pyc_pkg",
            DocumentKey::for_unit(&name("pkg"), UnitKind::Package),
            "",
        );
        let mut resolver = resolver_for(&store);

        let unit = resolver.resolve(&store, &name("pkg")).unwrap().found().unwrap();
        assert!(unit.is_package);
        assert_eq!(unit.key.as_str(), "code:pkg.__init__");
    }

    #[test]
    fn test_entry_point_is_not_a_package() {
        let store = MemoryStore::with_namespaces(["pyc_app"]);
        put(
            &store,
            "pyc_app",
            DocumentKey::for_unit(&name("app"), UnitKind::Entry),
            "run()",
        );
        let mut resolver = resolver_for(&store);

        let unit = resolver.resolve(&store, &name("app")).unwrap().found().unwrap();
        assert!(!unit.is_package);
        assert_eq!(unit.key.as_str(), "code:app.__main__");
    }

    #[test]
    fn test_package_beats_entry_point() {
        let store = MemoryStore::with_namespaces(["pyc_app"]);
        put(&store, "pyc_app", DocumentKey::for_unit(&name("app"), UnitKind::Entry), "main");
        put(&store, "pyc_app", DocumentKey::for_unit(&name("app"), UnitKind::Package), "init");
        let mut resolver = resolver_for(&store);

        let unit = resolver.resolve(&store, &name("app")).unwrap().found().unwrap();
        assert!(unit.is_package);
        assert_eq!(unit.document.current_source(), Some("init"));
    }

    #[test]
    fn test_bare_key_probed_first() {
        let store = MemoryStore::with_namespaces(["pyc_pkg"]);
        put(&store, "pyc_pkg", DocumentKey::bare(&name("pkg.util")), "plain");
        let mut resolver = resolver_for(&store);
        let before = store.stats();

        resolver.resolve(&store, &name("pkg.util")).unwrap();
        assert_eq!(store.stats().fetches - before.fetches, 1);
    }

    #[test]
    fn test_miss_probes_all_three_candidates() {
        let store = MemoryStore::with_namespaces(["pyc_pkg"]);
        let mut resolver = resolver_for(&store);
        let before = store.stats();

        let resolution = resolver.resolve(&store, &name("pkg.absent")).unwrap();
        assert_eq!(resolution, Resolution::NotFound);
        assert_eq!(store.stats().fetches - before.fetches, 3);
        assert!(resolver.cache().is_empty());
    }

    #[test]
    fn test_unknown_namespace_makes_no_store_call() {
        let store = MemoryStore::with_namespaces(["pyc_pkg"]);
        let mut resolver = resolver_for(&store);
        let before = store.stats();

        let resolution = resolver.resolve(&store, &name("other.mod")).unwrap();
        assert_eq!(resolution, Resolution::NotFound);
        assert_eq!(store.stats(), before);
    }

    #[test]
    fn test_cache_hit_makes_no_store_call() {
        let store = MemoryStore::with_namespaces(["pyc_pkg"]);
        put(&store, "pyc_pkg", DocumentKey::bare(&name("pkg.util")), "v1");
        let mut resolver = resolver_for(&store);

        resolver.resolve(&store, &name("pkg.util")).unwrap();
        let before = store.stats();
        let again = resolver.resolve(&store, &name("pkg.util")).unwrap();

        assert!(again.is_found());
        assert_eq!(store.stats(), before);
        assert_eq!(resolver.cache().len(), 1);
    }

    #[test]
    fn test_cached_result_survives_remote_change() {
        let store = MemoryStore::with_namespaces(["pyc_pkg"]);
        let key = DocumentKey::bare(&name("pkg.util"));
        put(&store, "pyc_pkg", key.clone(), "v1");
        let mut resolver = resolver_for(&store);
        resolver.resolve(&store, &name("pkg.util")).unwrap();

        let mut doc = store.fetch("pyc_pkg", &key).unwrap().unwrap();
        doc.revise("v2");
        store.save("pyc_pkg", &doc).unwrap();

        let unit = resolver.resolve(&store, &name("pkg.util")).unwrap().found().unwrap();
        assert_eq!(unit.document.current_source(), Some("v1"));
    }

    #[test]
    fn test_invalidate_requeries_store() {
        let store = MemoryStore::with_namespaces(["pyc_pkg"]);
        let key = DocumentKey::bare(&name("pkg.util"));
        put(&store, "pyc_pkg", key.clone(), "v1");
        let mut resolver = resolver_for(&store);
        resolver.resolve(&store, &name("pkg.util")).unwrap();

        let mut doc = store.fetch("pyc_pkg", &key).unwrap().unwrap();
        doc.revise("v2");
        store.save("pyc_pkg", &doc).unwrap();

        resolver.invalidate(&store).unwrap();
        assert!(resolver.cache().is_empty());

        let before = store.stats();
        let unit = resolver.resolve(&store, &name("pkg.util")).unwrap().found().unwrap();
        assert_eq!(store.stats().fetches - before.fetches, 1);
        assert_eq!(unit.document.current_source(), Some("v2"));
    }

    #[test]
    fn test_invalidate_picks_up_new_namespace() {
        let store = MemoryStore::with_namespaces(["pyc_pkg"]);
        let mut resolver = resolver_for(&store);

        store.create_namespace("pyc_late");
        put(&store, "pyc_late", DocumentKey::bare(&name("late")), "ok");
        assert_eq!(resolver.resolve(&store, &name("late")).unwrap(), Resolution::NotFound);

        resolver.invalidate(&store).unwrap();
        resolver.invalidate(&store).unwrap();
        assert!(resolver.resolve(&store, &name("late")).unwrap().is_found());
    }

    #[test]
    fn test_namespace_dropped_after_snapshot_is_not_found() {
        let store = MemoryStore::with_namespaces(["pyc_pkg"]);
        let mut resolver = Resolver::new("pyc", NamespaceSnapshot::from_names(["pyc_gone"]));

        let resolution = resolver.resolve(&store, &name("gone.mod")).unwrap();
        assert_eq!(resolution, Resolution::NotFound);
    }
}
