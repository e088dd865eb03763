//! couchload - load program units from a versioned document store
//!
//! Read path: a qualified name is resolved to a store document and its
//! current source is handed to the host load pipeline. Write path: local
//! source trees are pushed into the store, keeping every superseded
//! version in the document's history.

pub mod cli;
pub mod document;
pub mod loader;
pub mod observability;
pub mod pipeline;
pub mod resolver;
pub mod session;
pub mod store;
pub mod sync;
pub mod version_store;
