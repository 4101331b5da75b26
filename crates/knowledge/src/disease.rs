//! Disease records held by the knowledge base.

use serde::Serialize;
use std::collections::BTreeSet;
use triage_types::{NonEmptyText, TagId};

/// Domain-level carrier for one disease in the knowledge base.
///
/// Records are constructed once when the knowledge base is built and are never mutated
/// afterwards. Tag sets are validated against the shared [`crate::Vocabulary`] by
/// [`crate::KnowledgeBase::new`]; the text payloads are opaque to scoring and triage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiseaseRecord {
    /// Canonical display name (unique, case-insensitive).
    pub name: NonEmptyText,

    /// Alternative names used for lookup and free-text matching.
    pub aliases: Vec<NonEmptyText>,

    /// Symptom tags typical of this disease.
    pub symptoms: BTreeSet<TagId>,

    /// Symptom phrases as written for this disease, used by free-text matching. When empty,
    /// the vocabulary labels of `symptoms` stand in.
    pub phrases: Vec<String>,

    /// Exposure/context tags associated with this disease.
    pub contexts: BTreeSet<TagId>,

    /// Symptom tags that are warning signs specific to this disease.
    pub red_flags: BTreeSet<TagId>,

    pub incubation: Option<String>,
    pub transmission: Option<String>,
    pub key_tests: Vec<String>,
    pub typical_course: Option<String>,

    /// Prevention advice, in display order.
    pub prevention: Vec<String>,

    /// Home-care advice, in display order.
    pub home_care: Vec<String>,

    /// Notes intended for a clinician, when the record has any.
    pub clinician_notes: Option<Vec<String>>,

    /// Things to avoid, in display order.
    pub avoid: Vec<String>,
}

impl DiseaseRecord {
    /// Returns the canonical name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Canonical name followed by aliases, as written in the knowledge base.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(NonEmptyText::as_str))
    }
}
