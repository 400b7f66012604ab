//! DocumentStore trait for abstracting document and reference-file access.
//!
//! The engine never touches the filesystem itself. Batch code reads
//! reference files and documents through a store and hands rewritten
//! bytes back to it, so the same pipeline runs against a real project
//! tree or an in-memory fixture.

use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read '{path}': {message}")]
    ReadFailed { path: PathBuf, message: String },

    #[error("Failed to write '{path}': {message}")]
    WriteFailed { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

/// Shared document bytes (reference-counted).
pub type SharedBytes = Arc<Vec<u8>>;

/// A source and sink for document bytes.
///
/// # Implementations
///
/// - `FilesystemDocumentStore`: local files with atomic replace (in `entsync-resource`)
/// - `InMemoryDocumentStore`: pre-populated map, used by tests and previews
pub trait DocumentStore: Send + Sync + Debug {
    /// Read the full contents of the document at `path`.
    fn read(&self, path: &Path) -> Result<SharedBytes, StoreError>;

    /// Replace the contents of the document at `path`.
    ///
    /// Implementations must be all-or-nothing: after an error the previous
    /// contents are still in place, never a partial write.
    fn replace(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError>;

    /// Check whether a document exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Returns a human-readable name for this store (for logging).
    fn name(&self) -> &'static str;
}

/// A document store held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<PathBuf, SharedBytes>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or overwrite) a document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the internal lock is poisoned.
    pub fn insert(&self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) -> Result<(), StoreError> {
        let path = path.into();
        let mut documents = self.documents.write().map_err(|_| StoreError::WriteFailed {
            path: path.clone(),
            message: "document store lock poisoned".to_string(),
        })?;
        documents.insert(path, Arc::new(data.into()));
        Ok(())
    }

    /// Current contents of a document, if present.
    pub fn get(&self, path: &Path) -> Option<SharedBytes> {
        self.documents.read().ok()?.get(path).cloned()
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn read(&self, path: &Path) -> Result<SharedBytes, StoreError> {
        let documents = self.documents.read().map_err(|_| StoreError::ReadFailed {
            path: path.to_path_buf(),
            message: "document store lock poisoned".to_string(),
        })?;
        documents
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.to_path_buf()))
    }

    fn replace(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
        if !self.exists(path) {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        self.insert(path, contents.to_vec())
    }

    fn exists(&self, path: &Path) -> bool {
        self.documents
            .read()
            .map(|d| d.contains_key(path))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryDocumentStore"
    }
}
