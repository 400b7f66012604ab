//! Declaration strings and the per-document declaration set.

use crate::profile::{CompanionRule, DeclarationRule, GraphicsConfig};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// The literal text of one internal-subset line, leading tab included.
///
/// Equality and ordering are over the literal text only. Two declarations
/// naming the same entity with different text are different values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Declaration(String);

impl Declaration {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// `\t<!ENTITY % name PUBLIC "id" "path.ext"> %name;`
    pub fn parameter_entity(
        canonical_name: &str,
        public_id: &str,
        storage_path: &str,
        extension: &str,
    ) -> Self {
        Self(format!(
            "\t<!ENTITY % {name} PUBLIC \"{public_id}\" \"{storage_path}.{extension}\"> %{name};",
            name = canonical_name,
        ))
    }

    pub fn for_rule(rule: &DeclarationRule, extension: &str) -> Self {
        Self::parameter_entity(&rule.canonical_name, &rule.public_id, &rule.storage_path, extension)
    }

    pub fn for_companion(companion: &CompanionRule, extension: &str) -> Self {
        Self::parameter_entity(
            &companion.canonical_name,
            &companion.public_id,
            &companion.storage_path,
            extension,
        )
    }

    /// `\t<!ENTITY FO-1 SYSTEM "../graphics-SVG/FO-1.svg" NDATA svg>`
    pub fn graphic(name: &str, graphics: &GraphicsConfig) -> Self {
        Self(format!(
            "\t<!ENTITY {name} SYSTEM \"{dir}/{name}.{ext}\" NDATA {notation}>",
            dir = graphics.directory,
            ext = graphics.extension,
            notation = graphics.notation,
        ))
    }

    pub fn notation(literal: &str) -> Self {
        Self(format!("\t{}", literal.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deduplicated declarations, always iterated in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeclarationSet {
    declarations: BTreeSet<Declaration>,
}

impl DeclarationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate graphic and entity declarations, drop exact duplicates, sort.
    pub fn build(
        graphics: impl IntoIterator<Item = Declaration>,
        entities: impl IntoIterator<Item = Declaration>,
    ) -> Self {
        Self {
            declarations: graphics.into_iter().chain(entities).collect(),
        }
    }

    /// Returns `true` if the declaration was not already present.
    pub fn insert(&mut self, declaration: Declaration) -> bool {
        self.declarations.insert(declaration)
    }

    pub fn contains(&self, declaration: &Declaration) -> bool {
        self.declarations.contains(declaration)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn to_lines(&self) -> Vec<String> {
        self.iter().map(|d| d.as_str().to_string()).collect()
    }
}

impl<'a> IntoIterator for &'a DeclarationSet {
    type Item = &'a Declaration;
    type IntoIter = std::collections::btree_set::Iter<'a, Declaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.declarations.iter()
    }
}
