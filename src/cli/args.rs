//! CLI argument definitions using clap
//!
//! Commands:
//! - couchload load <name>... [--search-path <dir>]
//! - couchload sync <dir>
//! - couchload history <name> [--with-source]
//!
//! Global options (`--config`, `--url`, `--prefix`, `--debug`) override
//! values from the configuration file.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// couchload - load program units from a versioned document store
#[derive(Parser, Debug)]
#[command(name = "couchload")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Namespace prefix
    #[arg(long, alias = "dbprefix", global = true)]
    pub prefix: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve and load units, printing their source
    Load {
        /// Qualified names to load
        #[arg(required = true)]
        names: Vec<String>,

        /// Local source root searched after the store
        #[arg(long)]
        search_path: Option<PathBuf>,
    },

    /// Push every source file under a directory into the store
    Sync {
        /// Root of the source tree
        dir: PathBuf,
    },

    /// Show the current version and history of a unit
    History {
        /// Qualified name
        name: String,

        /// Include source text of every version
        #[arg(long)]
        with_source: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load_many() {
        let cli = Cli::try_parse_from(["couchload", "load", "pkg.a", "pkg.b"]).unwrap();
        match cli.command {
            Command::Load { names, search_path } => {
                assert_eq!(names, vec!["pkg.a", "pkg.b"]);
                assert!(search_path.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_load_requires_a_name() {
        assert!(Cli::try_parse_from(["couchload", "load"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "couchload", "sync", "src", "--url", "http://db:5984", "--dbprefix", "lib", "--debug",
        ])
        .unwrap();
        assert_eq!(cli.global.url.as_deref(), Some("http://db:5984"));
        assert_eq!(cli.global.prefix.as_deref(), Some("lib"));
        assert!(cli.global.debug);
        assert!(matches!(cli.command, Command::Sync { .. }));
    }

    #[test]
    fn test_parse_history() {
        let cli = Cli::try_parse_from(["couchload", "history", "pkg.util", "--with-source"]).unwrap();
        match cli.command {
            Command::History { name, with_source } => {
                assert_eq!(name, "pkg.util");
                assert!(with_source);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
