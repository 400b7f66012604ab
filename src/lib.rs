//! # entsync
//!
//! Rebuilds the DOCTYPE internal subset of technical-publication XML
//! documents from what each document actually references: parameter
//! entities for shared boilerplate, unparsed entities for graphics, and
//! the notation those graphics need.
//!
//! The workspace is split the same way the work is:
//!
//! - `entsync-core`: profile, catalog, scanning and rewriting (no I/O)
//! - `entsync-traits`: the executor and document-store seams
//! - `entsync-executor`: sequential and rayon executors
//! - `entsync-resource`: filesystem store with atomic replace, project discovery
//!
//! This crate adds the batch driver and the `entsync` command line tool.
//!
//! ```ignore
//! use entsync::{Batch, BatchMode, BatchOptions, FilesystemDocumentStore, Profile};
//! use std::sync::Arc;
//!
//! let options = BatchOptions { mode: BatchMode::Apply, ..Default::default() };
//! let batch = Batch::new(Profile::builtin()?, Arc::new(FilesystemDocumentStore::new()), options);
//! let load = batch.load_catalog(&reference_paths);
//! let report = batch.run(load.catalog, document_paths);
//! ```

pub mod batch;
pub mod error;

pub use batch::{
    Batch, BatchMode, BatchOptions, BatchReport, BatchSummary, CancellationToken, DocumentOutcome,
    DocumentReport, ReportCategory,
};
pub use error::BatchError;

pub use entsync_core::{
    Catalog, CatalogBuilder, CatalogLoad, Declaration, DeclarationRule, DeclarationSet, Engine,
    EngineError, Preparation, PreparedDocument, Profile, ScanConvention, UnresolvedPolicy,
};
pub use entsync_executor::{ExecutorImpl, PoolError};
pub use entsync_resource::{FilesystemDocumentStore, discover_documents, discover_reference_files};
pub use entsync_traits::{DocumentStore, InMemoryDocumentStore, SharedBytes, StoreError};
