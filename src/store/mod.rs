//! # Document Store
//!
//! The namespace/document store behind resolution and pushes.
//! `DocumentStore` is the seam; `CouchStore` talks to a CouchDB server and
//! `MemoryStore` keeps everything in process.

mod backend;
mod couch;
mod errors;
mod memory;

pub use backend::DocumentStore;
pub use couch::{CouchStore, Credentials, DEFAULT_TIMEOUT};
pub use errors::{StoreError, StoreResult};
pub use memory::{MemoryStore, StoreStats};
