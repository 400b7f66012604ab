//! Error types for catalog building, scanning and rewriting.
//!
//! Only profile errors stop a batch. Everything else describes what went
//! wrong with one reference file or one document and is folded into that
//! item's report by the caller.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to read reference file '{path}': {message}")]
    CatalogRead { path: PathBuf, message: String },

    #[error("Document '{path}' is not valid UTF-8: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Document '{path}' has no recognizable root element")]
    NoRootElement { path: PathBuf },

    #[error("Unresolved entity references: {}", format_names(.names))]
    UnresolvedEntities { names: Vec<String> },

    #[error("Invalid profile: {0}")]
    Profile(String),

    #[error("Profile is not valid JSON: {0}")]
    ProfileJson(#[from] serde_json::Error),
}

impl EngineError {
    pub fn profile(message: impl Into<String>) -> Self {
        Self::Profile(message.into())
    }
}

fn format_names(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("&{};", n))
        .collect::<Vec<_>>()
        .join(", ")
}
