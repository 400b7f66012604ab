//! One-document pipeline: decode, scan, build the set, rewrite.

use crate::catalog::Catalog;
use crate::declaration::DeclarationSet;
use crate::error::EngineError;
use crate::profile::Profile;
use crate::rewriter::Rewriter;
use crate::scanner::Scanner;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do with `&name;` references no rule resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// Leave them undeclared, warn, and rewrite anyway.
    #[default]
    Warn,
    /// Refuse to rewrite the document.
    Fail,
}

/// A document ready to be written (or shown).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDocument {
    pub root_element: String,
    pub declarations: DeclarationSet,
    pub unresolved: Vec<String>,
    /// The new prolog, `]>` line included.
    pub header: String,
    pub output: String,
    /// `false` if `output` is byte-identical to the input.
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preparation {
    /// Nothing but whitespace; never rewritten.
    Empty,
    Ready(PreparedDocument),
}

/// Owns a validated profile and runs the per-document pipeline.
#[derive(Debug, Clone)]
pub struct Engine {
    profile: Profile,
    policy: UnresolvedPolicy,
}

impl Engine {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            policy: UnresolvedPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn policy(&self) -> UnresolvedPolicy {
        self.policy
    }

    pub fn decode<'b>(path: &Path, bytes: &'b [u8]) -> Result<&'b str, EngineError> {
        std::str::from_utf8(bytes).map_err(|e| EngineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Scan `text` and compute its rewritten form.
    ///
    /// # Errors
    ///
    /// - `NoRootElement` if the document has no usable root (it must be skipped)
    /// - `UnresolvedEntities` under `UnresolvedPolicy::Fail`
    pub fn prepare(&self, path: &Path, text: &str, catalog: &Catalog) -> Result<Preparation, EngineError> {
        if text.trim_start_matches('\u{feff}').trim().is_empty() {
            return Ok(Preparation::Empty);
        }

        let outcome = Scanner::new(&self.profile).scan_text(text, catalog);
        let declarations = outcome.declarations();
        let root_element = outcome.root_element.ok_or_else(|| EngineError::NoRootElement {
            path: path.to_path_buf(),
        })?;

        if !outcome.unresolved.is_empty() {
            match self.policy {
                UnresolvedPolicy::Fail => {
                    return Err(EngineError::UnresolvedEntities {
                        names: outcome.unresolved,
                    });
                }
                UnresolvedPolicy::Warn => {
                    warn!(
                        "{}: {} entity reference(s) left undeclared: {}",
                        path.display(),
                        outcome.unresolved.len(),
                        outcome.unresolved.join(", ")
                    );
                }
            }
        }

        let rewriter = Rewriter::new(&self.profile.doctype);
        let header = rewriter.header(&root_element, &declarations);
        let output = rewriter.rewrite(text, &root_element, &declarations);
        let changed = output != text;

        Ok(Preparation::Ready(PreparedDocument {
            root_element,
            declarations,
            unresolved: outcome.unresolved,
            header,
            output,
            changed,
        }))
    }
}
