//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Namespace not found: {0}")]
    NamespaceNotFound(String),

    #[error("Document update conflict: {namespace}/{key}")]
    Conflict { namespace: String, key: String },

    #[error("Store unreachable: {0}")]
    Unreachable(String),

    #[error("Store rejected credentials")]
    Unauthorized,

    #[error("Unexpected store response: {0}")]
    Protocol(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_display() {
        let err = StoreError::Conflict {
            namespace: "pyc_pkg".into(),
            key: "code:pkg.util".into(),
        };
        assert_eq!(err.to_string(), "Document update conflict: pyc_pkg/code:pkg.util");
    }
}
