//! Batch driver: runs the engine over a list of documents.
//!
//! A batch is a map over documents. The catalog is built once and frozen,
//! then shared read-only with every worker. Each document is read,
//! prepared and (in apply mode) replaced independently; a failure in one
//! document is recorded in its report and never stops the others.
//!
//! Reports come back in input order whatever executor runs the batch.

use entsync_core::{
    Catalog, CatalogBuilder, CatalogLoad, Declaration, Engine, EngineError, Preparation, Profile,
    UnresolvedPolicy,
};
use entsync_executor::{Executor, ExecutorImpl};
use entsync_traits::DocumentStore;
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether documents are only inspected or also rewritten on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    #[default]
    Preview,
    Apply,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub mode: BatchMode,
    pub policy: UnresolvedPolicy,
    pub executor: ExecutorImpl,
}

/// Shared stop flag for a running batch.
///
/// Checked before each document starts. A document already in progress
/// always completes.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What happened to one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// Prepared in preview mode; nothing written.
    Previewed,
    /// Rewritten and replaced.
    Written,
    /// Rewritten bytes equal the current bytes; left alone.
    Unchanged,
    SkippedEmpty,
    /// No usable root element.
    SkippedInvalid,
    Cancelled,
    Failed,
}

/// Reporting categories a caller renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    Processed,
    SkippedEmpty,
    SkippedInvalid,
    Cancelled,
    Error,
}

impl DocumentOutcome {
    pub fn category(self) -> ReportCategory {
        match self {
            DocumentOutcome::Previewed | DocumentOutcome::Written | DocumentOutcome::Unchanged => {
                ReportCategory::Processed
            }
            DocumentOutcome::SkippedEmpty => ReportCategory::SkippedEmpty,
            DocumentOutcome::SkippedInvalid => ReportCategory::SkippedInvalid,
            DocumentOutcome::Cancelled => ReportCategory::Cancelled,
            DocumentOutcome::Failed => ReportCategory::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub outcome: DocumentOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_element: Option<String>,
    pub declarations: Vec<Declaration>,
    /// The prolog as written (or as it would be written, in preview).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentReport {
    fn new(path: PathBuf, outcome: DocumentOutcome) -> Self {
        Self {
            path,
            outcome,
            root_element: None,
            declarations: Vec::new(),
            header: None,
            warnings: Vec::new(),
            error: None,
        }
    }

    fn failed(path: PathBuf, error: impl ToString) -> Self {
        let mut report = Self::new(path, DocumentOutcome::Failed);
        report.error = Some(error.to_string());
        report
    }

    pub fn category(&self) -> ReportCategory {
        self.outcome.category()
    }
}

/// Per-category counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped_empty: usize,
    pub skipped_invalid: usize,
    pub cancelled: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for report in &self.documents {
            match report.category() {
                ReportCategory::Processed => summary.processed += 1,
                ReportCategory::SkippedEmpty => summary.skipped_empty += 1,
                ReportCategory::SkippedInvalid => summary.skipped_invalid += 1,
                ReportCategory::Cancelled => summary.cancelled += 1,
                ReportCategory::Error => summary.errors += 1,
            }
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.documents
            .iter()
            .any(|r| r.outcome == DocumentOutcome::Failed)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

pub struct Batch {
    engine: Arc<Engine>,
    store: Arc<dyn DocumentStore>,
    options: BatchOptions,
    cancel: CancellationToken,
}

impl Batch {
    pub fn new(profile: Profile, store: Arc<dyn DocumentStore>, options: BatchOptions) -> Self {
        let engine = Engine::new(profile).with_policy(options.policy);
        Self {
            engine: Arc::new(engine),
            store,
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// A handle that stops documents not yet started.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Build the frozen catalog from the given reference files.
    ///
    /// Unreadable reference files are reported in `failures`; the rest of
    /// the catalog is still built.
    pub fn load_catalog(&self, reference_paths: &[PathBuf]) -> CatalogLoad {
        let load = CatalogBuilder::load(self.store.as_ref(), reference_paths);
        info!(
            "Catalog: {} reference families, {} entity names ({} file(s) skipped)",
            load.catalog.len(),
            load.catalog.total_names(),
            load.failures.len()
        );
        load
    }

    pub fn run(&self, catalog: Catalog, documents: Vec<PathBuf>) -> BatchReport {
        info!(
            "{:?}: {} document(s) on {} (parallelism {})",
            self.options.mode,
            documents.len(),
            self.options.executor.name(),
            self.options.executor.parallelism()
        );

        let context = Arc::new(DocumentContext {
            engine: Arc::clone(&self.engine),
            store: Arc::clone(&self.store),
            catalog: Arc::new(catalog),
            mode: self.options.mode,
            cancel: self.cancel.clone(),
        });

        let documents = self
            .options
            .executor
            .execute_all(documents, move |path| context.process(path));
        let report = BatchReport { documents };

        let summary = report.summary();
        info!(
            "Done: {} processed, {} empty, {} invalid, {} cancelled, {} failed",
            summary.processed,
            summary.skipped_empty,
            summary.skipped_invalid,
            summary.cancelled,
            summary.errors
        );
        report
    }
}

/// Everything a worker needs to handle one document.
struct DocumentContext {
    engine: Arc<Engine>,
    store: Arc<dyn DocumentStore>,
    catalog: Arc<Catalog>,
    mode: BatchMode,
    cancel: CancellationToken,
}

impl DocumentContext {
    fn process(&self, path: PathBuf) -> DocumentReport {
        if self.cancel.is_cancelled() {
            return DocumentReport::new(path, DocumentOutcome::Cancelled);
        }

        let bytes = match self.store.read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("{}", e);
                return DocumentReport::failed(path, e);
            }
        };
        let text = match Engine::decode(&path, &bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("{}", e);
                return DocumentReport::failed(path, e);
            }
        };

        match self.engine.prepare(&path, text, &self.catalog) {
            Ok(Preparation::Empty) => {
                debug!("{}: empty, skipped", path.display());
                DocumentReport::new(path, DocumentOutcome::SkippedEmpty)
            }
            Ok(Preparation::Ready(prepared)) => {
                let mut report = DocumentReport::new(path, DocumentOutcome::Previewed);
                report.warnings = prepared
                    .unresolved
                    .iter()
                    .map(|name| format!("&{};: no declaration rule matches", name))
                    .collect();
                report.declarations = prepared.declarations.iter().cloned().collect();
                report.root_element = Some(prepared.root_element);
                report.header = Some(prepared.header);

                if self.mode == BatchMode::Apply {
                    report.outcome = if !prepared.changed {
                        DocumentOutcome::Unchanged
                    } else {
                        match self.write(&report.path, &prepared.output) {
                            Ok(()) => DocumentOutcome::Written,
                            Err(message) => {
                                report.error = Some(message);
                                DocumentOutcome::Failed
                            }
                        }
                    };
                }
                report
            }
            Err(e @ EngineError::NoRootElement { .. }) => {
                warn!("{}", e);
                let mut report = DocumentReport::new(path, DocumentOutcome::SkippedInvalid);
                report.warnings.push(e.to_string());
                report
            }
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                DocumentReport::failed(path, e)
            }
        }
    }

    fn write(&self, path: &Path, output: &str) -> Result<(), String> {
        self.store.replace(path, output.as_bytes()).map_err(|e| {
            warn!("{}", e);
            e.to_string()
        })?;
        debug!("{}: written", path.display());
        Ok(())
    }
}
