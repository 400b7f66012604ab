//! Filesystem-backed document store for native platforms.
//!
//! # Atomic replace
//!
//! `replace` never writes into the destination file. It writes a temporary
//! file in the same directory, flushes and syncs it, copies the original's
//! permissions onto it, and renames it over the destination. If any step
//! fails the temporary file is dropped (and deleted) and the original is
//! left untouched.
//!
//! # Rooted stores
//!
//! A store created with [`FilesystemDocumentStore::rooted`] resolves
//! relative paths against its root and refuses paths that escape it.

use entsync_traits::{DocumentStore, SharedBytes, StoreError};
use log::debug;
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct FilesystemDocumentStore {
    root: Option<PathBuf>,
    /// Canonicalized root for containment checks
    canonical_root: Option<PathBuf>,
}

impl FilesystemDocumentStore {
    /// A store that uses paths exactly as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store confined to `root`.
    pub fn rooted<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        // May fail if the root doesn't exist yet; containment then falls back to a component check.
        let canonical_root = root.canonicalize().ok();
        Self {
            root: Some(root),
            canonical_root,
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Resolve `path` against the root, if any.
    ///
    /// Returns `None` if the path would escape the root directory.
    fn resolve(&self, path: &Path) -> Option<PathBuf> {
        let Some(root) = &self.root else {
            return Some(path.to_path_buf());
        };

        let full_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        };

        if let Ok(canonical) = full_path.canonicalize()
            && let Some(base) = &self.canonical_root
        {
            return canonical.starts_with(base).then_some(canonical);
        }

        if path.is_absolute() {
            return full_path.starts_with(root).then_some(full_path);
        }
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return None;
        }
        Some(full_path)
    }

    fn resolve_or_not_found(&self, path: &Path) -> Result<PathBuf, StoreError> {
        self.resolve(path)
            .ok_or_else(|| StoreError::NotFound(path.to_path_buf()))
    }
}

impl DocumentStore for FilesystemDocumentStore {
    fn read(&self, path: &Path) -> Result<SharedBytes, StoreError> {
        let full_path = self.resolve_or_not_found(path)?;
        fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(path.to_path_buf())
            } else {
                StoreError::ReadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn replace(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
        let target = self.resolve_or_not_found(path)?;
        let write_failed = |e: io::Error| StoreError::WriteFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let permissions = match fs::metadata(&target) {
            Ok(metadata) => metadata.permissions(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(write_failed(e)),
        };

        let directory = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = tempfile::Builder::new()
            .prefix(".entsync-")
            .suffix(".tmp")
            .tempfile_in(directory)
            .map_err(write_failed)?;
        temp.write_all(contents).map_err(write_failed)?;
        temp.flush().map_err(write_failed)?;
        temp.as_file().sync_all().map_err(write_failed)?;
        temp.as_file().set_permissions(permissions).map_err(write_failed)?;
        temp.persist(&target).map_err(|e| write_failed(e.error))?;

        debug!("Replaced {} ({} bytes)", target.display(), contents.len());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }

    fn name(&self) -> &'static str {
        "FilesystemDocumentStore"
    }
}
