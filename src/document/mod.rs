//! # Versioned Document Model
//!
//! Data shape and archival rule shared by the push path and the
//! resolution path: qualified names, the `code:` key scheme, and the
//! `current` + `history` document.

mod errors;
mod key;
mod name;
mod version;

pub use errors::{DocumentError, DocumentResult};
pub use key::{DocumentKey, UnitKind, ENTRY_SUFFIX, KEY_PREFIX, PACKAGE_SUFFIX};
pub use name::{namespace_for, QualifiedName, NAMESPACE_JOINER, NAME_SEPARATOR};
pub use version::{Revision, VersionRecord, VersionedDocument};
