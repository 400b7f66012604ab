//! Document scanner: which declarations does one document need?

use crate::catalog::Catalog;
use crate::classifier::{LineClassifier, classifier_for, entity_references};
use crate::declaration::{Declaration, DeclarationSet};
use crate::mapper::DeclarationMapper;
use crate::profile::Profile;
use crate::rewriter::body_after_prolog;
use log::debug;
use std::collections::BTreeSet;

/// Everything a scan learned about one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub root_element: Option<String>,
    /// Graphic entity declarations plus, if any, the notation declaration.
    pub graphics: Vec<Declaration>,
    /// Resolved entity declarations plus their companions.
    pub entities: Vec<Declaration>,
    /// Referenced names no rule could resolve, sorted and distinct.
    pub unresolved: Vec<String>,
}

impl ScanOutcome {
    pub fn declarations(&self) -> DeclarationSet {
        DeclarationSet::build(self.graphics.iter().cloned(), self.entities.iter().cloned())
    }
}

/// Scans document lines against a frozen catalog.
///
/// Pure: the result depends only on the lines, the catalog and the profile.
#[derive(Debug)]
pub struct Scanner<'p> {
    profile: &'p Profile,
    classifier: Box<dyn LineClassifier>,
}

impl<'p> Scanner<'p> {
    /// A scanner using the classifier selected by the profile's convention.
    pub fn new(profile: &'p Profile) -> Self {
        Self::with_classifier(profile, classifier_for(profile))
    }

    pub fn with_classifier(profile: &'p Profile, classifier: Box<dyn LineClassifier>) -> Self {
        Self { profile, classifier }
    }

    pub fn classifier(&self) -> &dyn LineClassifier {
        self.classifier.as_ref()
    }

    /// Scan a whole document.
    ///
    /// The root element may be named anywhere, the old prolog included.
    /// Graphics and entity references only count in the part a rewrite
    /// keeps, so a stale internal subset never contributes declarations.
    pub fn scan_text(&self, text: &str, catalog: &Catalog) -> ScanOutcome {
        let document: Vec<&str> = text.lines().collect();
        let body: Vec<&str> = body_after_prolog(text).lines().collect();
        self.scan(&document, &body, catalog)
    }

    pub fn scan(&self, document: &[&str], body: &[&str], catalog: &Catalog) -> ScanOutcome {
        let root_element = self.classifier.root_element(document);

        let mut graphic_names = BTreeSet::new();
        let mut entity_names = BTreeSet::new();
        for line in body {
            graphic_names.extend(self.classifier.graphic_names(line));
            if line.contains('&') {
                entity_names.extend(entity_references(line));
            }
        }

        let mut graphics: Vec<Declaration> = graphic_names
            .iter()
            .map(|name| Declaration::graphic(name, &self.profile.graphics))
            .collect();
        if !graphics.is_empty()
            && let Some(notation) = &self.profile.graphics.notation_declaration
        {
            graphics.push(Declaration::notation(notation));
        }

        let mapper = DeclarationMapper::new(self.profile);
        let mut entities = Vec::new();
        let mut unresolved = Vec::new();
        for name in entity_names {
            match mapper.resolve(name, catalog) {
                Some(resolution) => {
                    entities.push(resolution.declaration);
                    entities.extend(resolution.companions);
                }
                None => unresolved.push(name.to_string()),
            }
        }

        debug!(
            "Scan ({}) found root {:?}, {} graphics, {} entities, {} unresolved",
            self.classifier.name(),
            root_element,
            graphic_names.len(),
            entities.len(),
            unresolved.len()
        );

        ScanOutcome {
            root_element,
            graphics,
            entities,
            unresolved,
        }
    }
}
