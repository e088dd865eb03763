//! couchload CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`. Any error is
//! printed to stderr and the process exits with status 1.

use couchload::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
