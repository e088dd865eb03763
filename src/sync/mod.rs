//! # Sync Walker
//!
//! Bulk push of a local source tree into the store. Writes only; the
//! resolution cache is never touched.

mod report;
mod walker;

pub use report::{SkipReason, SkippedEntry, SyncReport, SyncedUnit};
pub use walker::{qualified_name_for, SyncWalker, DEFAULT_SOURCE_SUFFIX, HIDDEN_MARKER};
