//! Document key scheme
//!
//! Keys are namespace-scoped:
//! - `code:<fullname>` for a plain unit
//! - `code:<fullname>.__init__` for a package
//! - `code:<fullname>.__main__` for an entry point
//!
//! Only the `code:` prefix is recognised.

use std::fmt;

use super::name::QualifiedName;

/// Prefix shared by every document key
pub const KEY_PREFIX: &str = "code:";

/// Suffix marking a package document
pub const PACKAGE_SUFFIX: &str = ".__init__";

/// Suffix marking an entry-point document
pub const ENTRY_SUFFIX: &str = ".__main__";

/// What a candidate key stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// A leaf unit
    Plain,
    /// A container of further units
    Package,
    /// An entry point
    Entry,
}

impl UnitKind {
    fn suffix(&self) -> &'static str {
        match self {
            UnitKind::Plain => "",
            UnitKind::Package => PACKAGE_SUFFIX,
            UnitKind::Entry => ENTRY_SUFFIX,
        }
    }
}

/// Store-unique identifier of a versioned document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Key of the given kind for a qualified name
    pub fn for_unit(name: &QualifiedName, kind: UnitKind) -> Self {
        Self(format!("{}{}{}", KEY_PREFIX, name.as_str(), kind.suffix()))
    }

    /// Bare key for a qualified name
    pub fn bare(name: &QualifiedName) -> Self {
        Self::for_unit(name, UnitKind::Plain)
    }

    /// Probe order used by resolution: plain, then package, then entry point.
    pub fn candidates(name: &QualifiedName) -> [(DocumentKey, UnitKind); 3] {
        [
            (Self::for_unit(name, UnitKind::Plain), UnitKind::Plain),
            (Self::for_unit(name, UnitKind::Package), UnitKind::Package),
            (Self::for_unit(name, UnitKind::Entry), UnitKind::Entry),
        ]
    }

    /// Wrap an existing key string
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True iff this key names a package document
    pub fn is_package(&self) -> bool {
        self.0.ends_with(PACKAGE_SUFFIX)
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
