//! The deployment profile: every project-specific literal the engine emits.
//!
//! Projects evolve their catalog of shared entity files over time, so the
//! rule table, DOCTYPE identifiers, graphic conventions and discovery
//! filters live in a JSON document instead of in code. A default profile
//! for MIL-STD-40051 projects is embedded in the crate.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const DEFAULT_PROFILE: &str = include_str!("../profiles/mil-std-40051.json");

/// Which historical convention locates the root element and graphic values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanConvention {
    /// First opening tag in the document is the root; graphics carry `boardno=`.
    #[default]
    RootTag,
    /// The root is named by an existing `<!DOCTYPE ...>` line; graphics use
    /// the first quoted literal on their line.
    DoctypeLine,
}

/// Fixed identifiers of the master grammar written into every DOCTYPE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctypeTemplate {
    pub public_id: String,
    pub system_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicsConfig {
    /// Opening-tag prefixes that mark a line as carrying a graphic reference.
    pub markers: Vec<String>,
    pub directory: String,
    pub extension: String,
    pub notation: String,
    /// Added once per document that references at least one graphic.
    #[serde(default)]
    pub notation_declaration: Option<String>,
}

/// One entry of the reference-file rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationRule {
    /// Reference-file identifier (file stem) this rule claims.
    pub key: String,
    pub canonical_name: String,
    /// Storage path without the reference extension.
    pub storage_path: String,
    pub public_id: String,
}

/// A declaration that must accompany any entity resolved to `trigger`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionRule {
    /// Canonical name of the rule that pulls this companion in.
    pub trigger: String,
    pub canonical_name: String,
    pub storage_path: String,
    pub public_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Substrings of a reference file's lower-cased path marking it as shared.
    pub reference_markers: Vec<String>,
    /// Name of the directory holding work-package documents.
    pub document_directory: String,
    pub document_extension: String,
    /// Documents whose lower-cased file name contains any of these are skipped.
    pub skip_terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub doctype: DoctypeTemplate,
    #[serde(default)]
    pub convention: ScanConvention,
    #[serde(default)]
    pub excluded_roots: Vec<String>,
    pub graphics: GraphicsConfig,
    pub reference_extension: String,
    /// Ordered: the first rule owning a name wins.
    pub rules: Vec<DeclarationRule>,
    #[serde(default)]
    pub companions: Vec<CompanionRule>,
    pub discovery: DiscoveryConfig,
}

impl Profile {
    /// Parse and validate a profile from JSON text.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let profile: Profile = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// The embedded MIL-STD-40051 profile.
    pub fn builtin() -> Result<Self, EngineError> {
        Self::from_json(DEFAULT_PROFILE)
    }

    /// The embedded MIL-STD-40051 profile, as JSON text.
    pub fn default_json() -> &'static str {
        DEFAULT_PROFILE
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_convention(mut self, convention: ScanConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let mut keys = HashSet::new();
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.key.is_empty() {
                return Err(EngineError::profile(format!("rule #{} has an empty key", index)));
            }
            if rule.canonical_name.is_empty() {
                return Err(EngineError::profile(format!(
                    "rule '{}' has an empty canonical name",
                    rule.key
                )));
            }
            if !keys.insert(rule.key.as_str()) {
                return Err(EngineError::profile(format!(
                    "rule key '{}' appears more than once",
                    rule.key
                )));
            }
        }
        for companion in &self.companions {
            if companion.trigger.is_empty() || companion.canonical_name.is_empty() {
                return Err(EngineError::profile(
                    "companion rules need a trigger and a canonical name",
                ));
            }
        }
        if self.graphics.markers.iter().any(|m| m.is_empty()) {
            return Err(EngineError::profile("graphic markers must not be empty"));
        }
        if self.reference_extension.is_empty() {
            return Err(EngineError::profile("reference extension must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_profile_is_valid() {
        let profile = Profile::from_json(Profile::default_json()).unwrap();
        assert_eq!(profile.convention, ScanConvention::RootTag);
        assert_eq!(profile.rules.len(), 22);
        assert_eq!(profile.rules[0].key, "dimboil");
        assert_eq!(profile.rules[21].key, "warning_summary");
        assert_eq!(profile.graphics.markers.len(), 5);
    }

    #[test]
    fn test_profile_round_trips_through_json() {
        let profile = Profile::builtin().unwrap();
        let json = profile.to_json().unwrap();
        assert_eq!(Profile::from_json(&json).unwrap(), profile);
    }

    #[test]
    fn test_duplicate_rule_key_is_rejected() {
        let mut profile = Profile::builtin().unwrap();
        let dup = profile.rules[3].clone();
        profile.rules.push(dup);
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_empty_marker_is_rejected() {
        let mut profile = Profile::builtin().unwrap();
        profile.graphics.markers.push(String::new());
        assert!(matches!(profile.validate(), Err(EngineError::Profile(_))));
    }

    #[test]
    fn test_convention_defaults_when_omitted() {
        let mut value: serde_json::Value =
            serde_json::from_str(Profile::default_json()).unwrap();
        value.as_object_mut().unwrap().remove("convention");
        let profile = Profile::from_json(&value.to_string()).unwrap();
        assert_eq!(profile.convention, ScanConvention::RootTag);
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let result = Profile::from_json("{ not json");
        assert!(matches!(result, Err(EngineError::ProfileJson(_))));
    }
}
