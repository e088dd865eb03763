//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero status.

use std::fmt;
use std::io;

use crate::loader::LoadError;
use crate::pipeline::PipelineError;
use crate::session::SessionError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file or credentials problem
    ConfigError,
    /// Store unreachable or credentials rejected
    ConnectionFailed,
    /// I/O error (stdout, local files)
    IoError,
    /// Requested name is not a valid qualified name
    InvalidName,
    /// No finder could load the unit
    UnitNotFound,
    /// Unit resolved to a document with no current version
    StaleReference,
    /// Store call failed after startup
    StoreFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "COUCHLOAD_CLI_CONFIG_ERROR",
            Self::ConnectionFailed => "COUCHLOAD_CLI_CONNECTION_FAILED",
            Self::IoError => "COUCHLOAD_CLI_IO_ERROR",
            Self::InvalidName => "COUCHLOAD_CLI_INVALID_NAME",
            Self::UnitNotFound => "COUCHLOAD_CLI_UNIT_NOT_FOUND",
            Self::StaleReference => "COUCHLOAD_CLI_STALE_REFERENCE",
            Self::StoreFailed => "COUCHLOAD_CLI_STORE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Unit not found
    pub fn unit_not_found(name: &str) -> Self {
        Self::new(
            CliErrorCode::UnitNotFound,
            format!("No unit named '{}'", name),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        let code = match &e {
            SessionError::Configuration(_) => CliErrorCode::ConfigError,
            SessionError::InvalidName(_) => CliErrorCode::InvalidName,
            SessionError::Connection(_) => CliErrorCode::ConnectionFailed,
            SessionError::Store(_) => CliErrorCode::StoreFailed,
            SessionError::Load(LoadError::StaleReference { .. }) => CliErrorCode::StaleReference,
        };
        Self::new(code, e.to_string())
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Session(inner) => inner.into(),
            PipelineError::UnitNotFound(name) => Self::unit_not_found(&name),
            PipelineError::InvalidName(_) => Self::new(CliErrorCode::InvalidName, e.to_string()),
            PipelineError::Load(_) => Self::new(CliErrorCode::StaleReference, e.to_string()),
            PipelineError::Io { .. } => Self::io_error(e.to_string()),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::QualifiedName;
    use crate::store::StoreError;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::unit_not_found("pkg.util");
        assert_eq!(
            err.to_string(),
            "COUCHLOAD_CLI_UNIT_NOT_FOUND: No unit named 'pkg.util'"
        );
    }

    #[test]
    fn test_connection_and_configuration_are_distinct() {
        let config: CliError = SessionError::Configuration("missing".into()).into();
        let connect: CliError = SessionError::Connection(StoreError::Unauthorized).into();
        assert_eq!(config.code(), &CliErrorCode::ConfigError);
        assert_eq!(connect.code(), &CliErrorCode::ConnectionFailed);
        assert_ne!(config.code_str(), connect.code_str());
    }

    #[test]
    fn test_invalid_name_is_not_a_config_error() {
        let bad = QualifiedName::parse("a..b").unwrap_err();
        let from_pipeline: CliError = PipelineError::InvalidName(bad.clone()).into();
        let from_session: CliError = SessionError::InvalidName(bad).into();

        assert_eq!(from_pipeline.code(), &CliErrorCode::InvalidName);
        assert_eq!(from_session.code(), &CliErrorCode::InvalidName);
        assert_eq!(from_pipeline.code_str(), "COUCHLOAD_CLI_INVALID_NAME");
        assert_ne!(from_session.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_stale_reference_code() {
        let err: CliError = PipelineError::Load(LoadError::StaleReference {
            name: "pkg.util".into(),
            namespace: "pyc_pkg".into(),
            key: "code:pkg.util".into(),
        })
        .into();
        assert_eq!(err.code(), &CliErrorCode::StaleReference);
    }
}
