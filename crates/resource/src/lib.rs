//! Filesystem access for entsync batches.
//!
//! This crate provides the native implementations behind the engine's
//! platform seams.
//!
//! ## Available Components
//!
//! - [`FilesystemDocumentStore`]: reads documents and replaces them atomically
//! - [`discover_reference_files`] / [`discover_documents`]: project enumeration
//!
//! ## Re-exports
//!
//! For convenience, we also re-export the in-memory store from entsync-traits:
//! - [`InMemoryDocumentStore`]: Pre-populated in-memory storage

mod discovery;
mod filesystem;

pub use discovery::{discover_documents, discover_reference_files};
pub use filesystem::FilesystemDocumentStore;

pub use entsync_traits::InMemoryDocumentStore;
