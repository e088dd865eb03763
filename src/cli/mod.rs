//! CLI module for couchload
//!
//! Provides command-line interface for:
//! - load: resolve units through the store (and an optional local root)
//! - sync: push a local source tree into the store
//! - history: inspect a unit's versions

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, GlobalArgs};
pub use commands::{history, load, run, run_command, sync};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_response_to};
