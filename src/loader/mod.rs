//! # Loader
//!
//! Turns a resolved unit into the source text to load. A document that
//! exists but never received a real push has no current version; loading
//! it is a `StaleReference`, never empty source.

use thiserror::Error;

use crate::resolver::ResolvedUnit;

/// Result type for load operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Load errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Stale reference: {name} resolved to {namespace}/{key} which has no current version")]
    StaleReference {
        name: String,
        namespace: String,
        key: String,
    },
}

/// Scheme used for the origin of store-loaded units
pub const ORIGIN_SCHEME: &str = "x-couchload";

/// Origin string reported to the host for a store unit
pub fn origin(unit: &ResolvedUnit) -> String {
    format!("{}:{}", ORIGIN_SCHEME, unit.name)
}

/// Current source text of a resolved unit
pub fn load(unit: &ResolvedUnit) -> LoadResult<&str> {
    unit.document
        .current_source()
        .ok_or_else(|| LoadError::StaleReference {
            name: unit.name.to_string(),
            namespace: unit.namespace.clone(),
            key: unit.key.to_string(),
        })
}
