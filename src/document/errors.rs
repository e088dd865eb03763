//! # Document Errors

use thiserror::Error;

/// Result type for document model operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Document model errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Invalid qualified name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}
