//! # Session
//!
//! The context object built at startup and threaded through every
//! operation: store handle, namespace prefix, namespace snapshot and
//! resolution cache. Nothing here is process-global; two sessions never
//! share state.

mod errors;

pub use errors::{SessionError, SessionResult};

use std::path::Path;

use crate::document::QualifiedName;
use crate::loader::{self, LoadResult};
use crate::observability::{log_event_with_fields, Event};
use crate::resolver::{NamespaceSnapshot, Resolution, ResolvedUnit, Resolver};
use crate::store::{CouchStore, Credentials, DocumentStore};
use crate::sync::{SyncReport, SyncWalker, DEFAULT_SOURCE_SUFFIX};
use crate::version_store::{PushOutcome, VersionStore};

/// Default namespace prefix
pub const DEFAULT_PREFIX: &str = "pyc";

/// Environment variable holding the store username
pub const USER_ENV: &str = "COUCHUSER";

/// Environment variable holding the store password
pub const PASSWORD_ENV: &str = "COUCHPASS";

/// Read credentials through `lookup`, normally the process environment
pub fn credentials_from<F>(lookup: F) -> SessionResult<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    match (lookup(USER_ENV), lookup(PASSWORD_ENV)) {
        (Some(user), Some(pass)) => Ok(Credentials::new(user, pass)),
        _ => Err(SessionError::Configuration(format!(
            "please configure the {} and {} environment variables",
            USER_ENV, PASSWORD_ENV
        ))),
    }
}

/// Read credentials from `COUCHUSER` / `COUCHPASS`
pub fn credentials_from_env() -> SessionResult<Credentials> {
    credentials_from(|var| std::env::var(var).ok())
}

/// Store handle plus resolution state
#[derive(Debug)]
pub struct Session {
    store: Box<dyn DocumentStore>,
    resolver: Resolver,
    source_suffix: String,
}

impl Session {
    /// Connect to a CouchDB server and take the first namespace snapshot
    pub fn connect(url: &str, credentials: &Credentials, prefix: &str) -> SessionResult<Self> {
        let store = CouchStore::connect(url, credentials).map_err(SessionError::Connection)?;
        log_event_with_fields(Event::StoreConnected, &[("url", url)]);
        Self::open(Box::new(store), prefix)
    }

    /// Wrap an already-open store and take the first namespace snapshot
    pub fn open(store: Box<dyn DocumentStore>, prefix: &str) -> SessionResult<Self> {
        let snapshot = NamespaceSnapshot::fetch(store.as_ref()).map_err(SessionError::Connection)?;
        Ok(Self {
            store,
            resolver: Resolver::new(prefix, snapshot),
            source_suffix: DEFAULT_SOURCE_SUFFIX.to_string(),
        })
    }

    /// Source-file extension used by `sync_tree` (without the dot)
    pub fn with_source_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.source_suffix = suffix.into();
        self
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn prefix(&self) -> &str {
        self.resolver.prefix()
    }

    pub fn namespaces(&self) -> &NamespaceSnapshot {
        self.resolver.snapshot()
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolve a qualified name; `NotFound` is a normal answer
    pub fn resolve(&mut self, name: &str) -> SessionResult<Resolution> {
        let name = QualifiedName::parse(name)?;
        Ok(self.resolver.resolve(self.store.as_ref(), &name)?)
    }

    /// Current source of a resolved unit
    pub fn load<'u>(&self, unit: &'u ResolvedUnit) -> LoadResult<&'u str> {
        loader::load(unit)
    }

    /// Upsert one unit's document in `namespace`
    pub fn push_unit(&self, namespace: &str, name: &str, source: &str) -> SessionResult<PushOutcome> {
        let name = QualifiedName::parse(name)?;
        Ok(VersionStore::new(self.store.as_ref()).push(namespace, &name, source)?)
    }

    /// Push every matching source file under `root`
    pub fn sync_tree(&self, root: &Path) -> SessionResult<SyncReport> {
        let walker = SyncWalker::new(
            VersionStore::new(self.store.as_ref()),
            self.resolver.snapshot(),
            self.resolver.prefix(),
        )
        .with_source_suffix(&self.source_suffix);
        Ok(walker.sync_tree(root)?)
    }

    /// Clear the resolution cache and re-list namespaces
    pub fn invalidate_caches(&mut self) -> SessionResult<()> {
        self.resolver.invalidate(self.store.as_ref())?;
        Ok(())
    }
}
