//! Knowledge base boundary support.
//!
//! This crate owns the declarative, on-disk representation of the disease knowledge base and
//! the controlled tag vocabulary, and the translation of that representation into immutable
//! domain structures:
//! - YAML wire models with strict (`deny_unknown_fields`) parsing
//! - construction-time validation (unique names/aliases, vocabulary membership)
//! - case-insensitive lookup by canonical name or alias
//!
//! Scoring and triage logic live in `triage-core`. This crate holds data only.

pub mod disease;
pub mod registry;
pub mod vocabulary;
mod wire;

use std::path::PathBuf;

pub use disease::DiseaseRecord;
pub use registry::KnowledgeBase;
pub use vocabulary::{TagSection, Vocabulary};

/// The built-in knowledge base shipped with the advisor.
pub const BUILTIN_KNOWLEDGE_BASE: &str = include_str!("../data/knowledge_base.yaml");

/// Errors returned by the `knowledge` crate.
///
/// All of these are configuration errors: they are raised while a knowledge base is being
/// constructed and must abort start-up.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read knowledge base file {path}: {source}", path = path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("translation error: {0}")]
    Translation(String),

    #[error("duplicate disease name or alias '{name}' (claimed by '{first}' and '{second}')")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    #[error("disease '{disease}' references {section} tag '{tag}' which is not in the vocabulary")]
    UnknownTag {
        disease: String,
        section: TagSection,
        tag: String,
    },
}

/// Type alias for Results that can fail with a [`KnowledgeError`].
pub type KnowledgeResult<T> = Result<T, KnowledgeError>;
