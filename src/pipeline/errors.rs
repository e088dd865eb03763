//! # Pipeline Errors

use thiserror::Error;

use crate::document::DocumentError;
use crate::loader::LoadError;
use crate::session::SessionError;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Load pipeline errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("No finder could load unit: {0}")]
    UnitNotFound(String),

    #[error(transparent)]
    InvalidName(#[from] DocumentError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },
}
