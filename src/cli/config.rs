//! Configuration file and flag merging
//!
//! The optional JSON file is read first; command-line flags override it.
//! Every field has a default, so an empty object is a valid file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::session::DEFAULT_PREFIX;
use crate::sync::DEFAULT_SOURCE_SUFFIX;

use super::args::GlobalArgs;
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Store URL (default http://localhost:5984)
    #[serde(default = "default_url")]
    pub url: String,

    /// Namespace prefix (default "pyc")
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Source-file extension without the dot (default "py")
    #[serde(default = "default_source_suffix")]
    pub source_suffix: String,

    /// Debug logging (default false)
    #[serde(default)]
    pub debug: bool,

    /// Local source root searched after the store by `load`
    #[serde(default)]
    pub search_path: Option<PathBuf>,
}

fn default_url() -> String {
    "http://localhost:5984".to_string()
}
fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}
fn default_source_suffix() -> String {
    DEFAULT_SOURCE_SUFFIX.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            prefix: default_prefix(),
            source_suffix: default_source_suffix(),
            debug: false,
            search_path: None,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// File (if any) overlaid with flags
    pub fn from_args(args: &GlobalArgs) -> CliResult<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(url) = &args.url {
            config.url = url.clone();
        }
        if let Some(prefix) = &args.prefix {
            config.prefix = prefix.clone();
        }
        if args.debug {
            config.debug = true;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        Url::parse(&self.url)
            .map_err(|e| CliError::config_error(format!("Invalid url '{}': {}", self.url, e)))?;

        if self.prefix.is_empty() {
            return Err(CliError::config_error("prefix must not be empty"));
        }

        if self.source_suffix.is_empty() || self.source_suffix.starts_with('.') {
            return Err(CliError::config_error(format!(
                "Invalid source_suffix: '{}'. Give the extension without a leading dot.",
                self.source_suffix
            )));
        }

        Ok(())
    }
}
