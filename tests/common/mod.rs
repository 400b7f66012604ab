#![allow(dead_code)]

pub mod fixtures;

use entsync::{Catalog, CatalogBuilder, Engine, Preparation, PreparedDocument, Profile};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a catalog from `(identifier, reference file text)` pairs.
pub fn catalog_from(references: &[(&str, &str)]) -> Catalog {
    let mut builder = CatalogBuilder::new();
    for (identifier, text) in references {
        builder.add_reference(*identifier, text);
    }
    builder.build()
}

/// Run the engine and unwrap a ready document, panicking on anything else.
pub fn prepare(engine: &Engine, text: &str, catalog: &Catalog) -> PreparedDocument {
    match engine.prepare(Path::new("files/wp.xml"), text, catalog) {
        Ok(Preparation::Ready(doc)) => doc,
        other => panic!("expected a prepared document, got {:?}", other),
    }
}

pub fn builtin_engine() -> Engine {
    Engine::new(Profile::builtin().expect("built-in profile must be valid"))
}

/// A throwaway project tree on disk.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` at `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(&path, contents).expect("failed to write fixture");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative)).expect("failed to read fixture")
    }
}
