//! # entsync-core
//!
//! Resolves and rewrites the internal-subset declarations of technical
//! publication documents.
//!
//! - **profile**: the deployment's rule table and fixed identifiers
//! - **catalog**: which entity names each shared reference file declares
//! - **mapper**: entity name -> canonical parameter-entity declaration
//! - **classifier** / **scanner**: what one document references
//! - **declaration**: deduplicated, sorted declaration sets
//! - **rewriter**: new prolog + original body
//! - **engine**: the per-document pipeline tying these together
//!
//! ## Design Principle
//!
//! This crate does no I/O of its own beyond the `DocumentStore` it is handed
//! when loading a catalog. Scanning and rewriting are pure functions of the
//! document text, the frozen catalog and the profile.

pub mod catalog;
pub mod classifier;
pub mod declaration;
pub mod engine;
pub mod error;
pub mod mapper;
pub mod profile;
pub mod rewriter;
pub mod scanner;

pub use catalog::{Catalog, CatalogBuilder, CatalogLoad, EntityFamily};
pub use classifier::{DoctypeLineClassifier, LineClassifier, RootTagClassifier};
pub use declaration::{Declaration, DeclarationSet};
pub use engine::{Engine, Preparation, PreparedDocument, UnresolvedPolicy};
pub use error::EngineError;
pub use mapper::{DeclarationMapper, Resolution};
pub use profile::{
    CompanionRule, DeclarationRule, DiscoveryConfig, DoctypeTemplate, GraphicsConfig, Profile,
    ScanConvention,
};
pub use rewriter::Rewriter;
pub use scanner::{ScanOutcome, Scanner};
