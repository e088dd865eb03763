//! Observable events
//!
//! Events are explicit and typed. Each maps to a fixed log event name.

use std::fmt;

use super::logger::Severity;

/// Observable events in couchload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Store reachable and credentials accepted
    StoreConnected,
    /// Store unreachable or credentials rejected (FATAL)
    StoreConnectFailed,
    /// Credentials missing from the environment (FATAL)
    CredentialsMissing,

    // Resolution
    /// Namespace snapshot re-listed from the store
    NamespacesRefreshed,
    /// Resolution cache cleared
    CachesInvalidated,
    /// A qualified name resolved to a document
    UnitResolved,
    /// Namespace exists but no candidate key does
    UnitNotFound,
    /// Unit handed to the host pipeline
    UnitLoaded,

    // Push
    /// Former current version moved into history
    VersionArchived,
    /// New current version written
    UnitPushed,
    /// Push skipped because the source is byte-identical
    UnitUnchanged,

    // Sync
    /// A namespace subtree is being synced
    SyncNamespace,
    /// An entry or subtree was skipped
    SyncSkipped,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreConnected => "STORE_CONNECTED",
            Event::StoreConnectFailed => "STORE_CONNECT_FAILED",
            Event::CredentialsMissing => "CREDENTIALS_MISSING",

            Event::NamespacesRefreshed => "NAMESPACES_REFRESHED",
            Event::CachesInvalidated => "CACHES_INVALIDATED",
            Event::UnitResolved => "UNIT_RESOLVED",
            Event::UnitNotFound => "UNIT_NOT_FOUND",
            Event::UnitLoaded => "UNIT_LOADED",

            Event::VersionArchived => "VERSION_ARCHIVED",
            Event::UnitPushed => "UNIT_PUSHED",
            Event::UnitUnchanged => "UNIT_UNCHANGED",

            Event::SyncNamespace => "SYNC_NAMESPACE",
            Event::SyncSkipped => "SYNC_SKIPPED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StoreConnectFailed | Event::CredentialsMissing => Severity::Fatal,
            Event::UnitNotFound => Severity::Warn,
            Event::SyncSkipped | Event::UnitUnchanged => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
