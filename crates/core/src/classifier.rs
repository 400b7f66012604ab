//! Line classifiers: the pattern-recognition half of the scanner.
//!
//! Two historical conventions exist for finding a document's root element
//! and its graphic values. Each is a [`LineClassifier`]; the scanner picks
//! one from the profile and never branches on the convention itself.

use crate::profile::{Profile, ScanConvention};
use regex::Regex;
use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::LazyLock;

static START_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([A-Za-z_][A-Za-z0-9._-]*)").expect("BUG: invalid START_TAG_RE regex literal")
});

static DOCTYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!DOCTYPE\s+([A-Za-z_][A-Za-z0-9._:-]*)")
        .expect("BUG: invalid DOCTYPE_RE regex literal")
});

static BOARDNO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"boardno\s*=\s*["']([A-Za-z0-9_.-]+)["']"#)
        .expect("BUG: invalid BOARDNO_RE regex literal")
});

static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]*)"|'([^']*)'"#).expect("BUG: invalid QUOTED_RE regex literal")
});

static GRAPHIC_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+$").expect("BUG: invalid GRAPHIC_NAME_RE regex literal")
});

static ENTITY_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&([A-Za-z0-9._-]+);").expect("BUG: invalid ENTITY_REF_RE regex literal")
});

/// Entities every XML processor predefines; they never need a declaration.
const PREDEFINED_ENTITIES: [&str; 5] = ["amp", "lt", "gt", "quot", "apos"];

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Recognizes root elements and graphic references for one convention.
pub trait LineClassifier: Send + Sync + Debug {
    /// The document's root element name, or `None` if the document has no
    /// usable root under this convention.
    fn root_element(&self, lines: &[&str]) -> Option<String>;

    /// Graphic names referenced on `line` (empty for non-graphic lines).
    fn graphic_names<'l>(&self, line: &'l str) -> Vec<&'l str>;

    fn name(&self) -> &'static str;
}

/// Build the classifier selected by the profile's convention.
pub fn classifier_for(profile: &Profile) -> Box<dyn LineClassifier> {
    match profile.convention {
        ScanConvention::RootTag => Box::new(RootTagClassifier::new(
            profile.graphics.markers.clone(),
            profile.excluded_roots.iter().cloned(),
        )),
        ScanConvention::DoctypeLine => {
            Box::new(DoctypeLineClassifier::new(profile.graphics.markers.clone()))
        }
    }
}

/// Names of all `&name;` references on a line, predefined entities excluded.
pub fn entity_references(line: &str) -> impl Iterator<Item = &str> {
    ENTITY_REF_RE
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| !PREDEFINED_ENTITIES.contains(name))
}

/// `true` if the line is the start tag of an element (not a declaration,
/// processing instruction, comment or end tag).
pub fn is_element_start(line: &str) -> bool {
    START_TAG_RE.is_match(strip_indent(line))
}

fn strip_indent(line: &str) -> &str {
    line.trim_start_matches(BYTE_ORDER_MARK).trim_start()
}

fn has_marker(markers: &[String], line: &str) -> bool {
    markers.iter().any(|m| line.contains(m.as_str()))
}

/// Convention (a): the first opening tag names the root.
#[derive(Debug, Clone)]
pub struct RootTagClassifier {
    markers: Vec<String>,
    excluded_roots: HashSet<String>,
}

impl RootTagClassifier {
    pub fn new(markers: Vec<String>, excluded_roots: impl IntoIterator<Item = String>) -> Self {
        Self {
            markers,
            excluded_roots: excluded_roots.into_iter().collect(),
        }
    }
}

impl LineClassifier for RootTagClassifier {
    fn root_element(&self, lines: &[&str]) -> Option<String> {
        let tag = lines
            .iter()
            .find_map(|line| START_TAG_RE.captures(strip_indent(line)))?
            .get(1)?
            .as_str();

        // Only the first tag counts; a rejected one leaves the document rootless.
        if tag.len() < 2 || self.excluded_roots.contains(tag) {
            return None;
        }
        Some(tag.to_string())
    }

    fn graphic_names<'l>(&self, line: &'l str) -> Vec<&'l str> {
        if !has_marker(&self.markers, line) {
            return Vec::new();
        }
        BOARDNO_RE
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    fn name(&self) -> &'static str {
        "root-tag"
    }
}

/// Convention (b): an existing DOCTYPE line names the root.
#[derive(Debug, Clone)]
pub struct DoctypeLineClassifier {
    markers: Vec<String>,
}

impl DoctypeLineClassifier {
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }
}

impl LineClassifier for DoctypeLineClassifier {
    fn root_element(&self, lines: &[&str]) -> Option<String> {
        lines
            .iter()
            .find(|line| line.contains("<!DOCTYPE"))
            .and_then(|line| DOCTYPE_RE.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn graphic_names<'l>(&self, line: &'l str) -> Vec<&'l str> {
        if !has_marker(&self.markers, line) {
            return Vec::new();
        }
        // The first literal decides; one that is not a name yields nothing.
        QUOTED_RE
            .captures(line)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str())
            .filter(|value| GRAPHIC_NAME_RE.is_match(value))
            .map(|value| vec![value])
            .unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        "doctype-line"
    }
}
