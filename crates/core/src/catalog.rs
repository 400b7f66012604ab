//! Reference catalog: which entity names each shared reference file declares.
//!
//! The catalog is built once per batch through [`CatalogBuilder`] and is
//! immutable afterwards; document scans only ever see `&Catalog`.

use crate::error::EngineError;
use entsync_traits::DocumentStore;
use log::{debug, warn};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static DECLARED_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!ENTITY\s+([A-Za-z0-9._-]+)").expect("BUG: invalid DECLARED_NAME_RE regex literal")
});

/// Entity names declared by one reference file, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityFamily {
    names: Vec<String>,
    index: HashSet<String>,
}

impl EntityFamily {
    fn extend(&mut self, names: impl IntoIterator<Item = String>) {
        for name in names {
            if self.index.insert(name.clone()) {
                self.names.push(name);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Frozen mapping from reference-file identifier to the names it owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    families: BTreeMap<String, EntityFamily>,
}

impl Catalog {
    pub fn family(&self, identifier: &str) -> Option<&EntityFamily> {
        self.families.get(identifier)
    }

    /// `false` both when the identifier is unknown and when the name is absent.
    pub fn owns(&self, identifier: &str, name: &str) -> bool {
        self.family(identifier).is_some_and(|f| f.contains(name))
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn total_names(&self) -> usize {
        self.families.values().map(EntityFamily::len).sum()
    }
}

/// Result of loading a catalog from a store: the catalog plus any
/// reference files that had to be left out.
#[derive(Debug)]
pub struct CatalogLoad {
    pub catalog: Catalog,
    pub failures: Vec<EngineError>,
}

#[derive(Debug, Default)]
pub struct CatalogBuilder {
    families: BTreeMap<String, EntityFamily>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the names declared in `text` under `identifier`.
    ///
    /// Two files sharing an identifier are merged; the first occurrence of
    /// each name is kept.
    pub fn add_reference(&mut self, identifier: impl Into<String>, text: &str) -> &mut Self {
        let identifier = identifier.into();
        let names = extract_declared_names(text);
        debug!("Reference '{}' declares {} entities", identifier, names.len());
        self.families.entry(identifier).or_default().extend(names);
        self
    }

    /// Read every reference file through `store` and build the catalog.
    ///
    /// Unreadable or undecodable files are logged and skipped; they never
    /// abort the load.
    pub fn load(store: &dyn DocumentStore, paths: &[PathBuf]) -> CatalogLoad {
        let mut builder = Self::new();
        let mut failures = Vec::new();

        for path in paths {
            match read_reference(store, path) {
                Ok((identifier, text)) => {
                    builder.add_reference(identifier, &text);
                }
                Err(err) => {
                    warn!("{}", err);
                    failures.push(err);
                }
            }
        }

        CatalogLoad {
            catalog: builder.build(),
            failures,
        }
    }

    pub fn build(self) -> Catalog {
        Catalog {
            families: self.families,
        }
    }
}

fn read_reference(store: &dyn DocumentStore, path: &Path) -> Result<(String, String), EngineError> {
    let identifier = reference_identifier(path).ok_or_else(|| EngineError::CatalogRead {
        path: path.to_path_buf(),
        message: "file name has no stem".to_string(),
    })?;
    let bytes = store.read(path).map_err(|e| EngineError::CatalogRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let text = String::from_utf8(bytes.to_vec()).map_err(|e| EngineError::CatalogRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok((identifier, text))
}

/// A reference file's identifier: its file name without extension.
pub fn reference_identifier(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Names declared by `<!ENTITY name ...` lines, first occurrence only.
///
/// Parameter entities (`<!ENTITY % name`) are not usable as `&name;` and
/// never match.
pub fn extract_declared_names(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for line in text.lines().filter(|l| l.contains("<!ENTITY")) {
        for caps in DECLARED_NAME_RE.captures_iter(line) {
            let name = &caps[1];
            if seen.insert(name.to_string()) {
                names.push(name.to_string());
            }
        }
    }
    names
}
