//! # Session Errors

use thiserror::Error;

use crate::document::DocumentError;
use crate::loader::LoadError;
use crate::store::StoreError;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Session errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Required credentials are missing (fatal at startup)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Store unreachable or credentials rejected at startup (fatal)
    #[error("Unable to connect to store: {0}")]
    Connection(StoreError),

    #[error(transparent)]
    InvalidName(#[from] DocumentError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl SessionError {
    /// Fatal errors end the process
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::Configuration(_) | SessionError::Connection(_)
        )
    }
}
