//! YAML wire models for the knowledge base document.
//!
//! Responsibilities:
//! - Define a strict wire model for deserialisation
//! - Translate the wire model into domain types
//!
//! Vocabulary membership and name uniqueness are checked afterwards by
//! [`crate::KnowledgeBase::new`], so programmatically built knowledge bases get the same checks.

use crate::{DiseaseRecord, KnowledgeError, KnowledgeResult, Vocabulary};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use triage_types::{NonEmptyText, TagId};

/// Parsed knowledge base document, prior to validation.
#[derive(Debug)]
pub(crate) struct KnowledgeDocument {
    pub vocabulary: Vocabulary,
    pub general_red_flags: Vec<String>,
    pub disclaimer: Vec<String>,
    pub diseases: Vec<DiseaseRecord>,
}

/// Parse a knowledge base document from YAML text.
///
/// This uses `serde_path_to_error` so a schema mismatch names the failing field, for example
/// `diseases[2].symptoms[0]`.
pub(crate) fn parse(yaml_text: &str) -> KnowledgeResult<KnowledgeDocument> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

    let wire = match serde_path_to_error::deserialize::<_, KnowledgeBaseWire>(deserializer) {
        Ok(parsed) => parsed,
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() {
                "<root>"
            } else {
                path.as_str()
            };
            return Err(KnowledgeError::Translation(format!(
                "Knowledge base schema mismatch at {path}: {source}"
            )));
        }
    };

    Ok(wire_to_domain(wire))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KnowledgeBaseWire {
    vocabulary: VocabularyWire,
    #[serde(default)]
    general_red_flags: Vec<String>,
    #[serde(default)]
    disclaimer: Vec<String>,
    diseases: Vec<DiseaseWire>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VocabularyWire {
    symptoms: BTreeMap<TagId, NonEmptyText>,
    #[serde(default)]
    exposures: BTreeMap<TagId, NonEmptyText>,
    #[serde(default)]
    flags: BTreeMap<TagId, NonEmptyText>,
    #[serde(default)]
    comorbidities: BTreeMap<TagId, NonEmptyText>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DiseaseWire {
    name: NonEmptyText,
    #[serde(default)]
    aliases: Vec<NonEmptyText>,
    symptoms: BTreeSet<TagId>,
    #[serde(default)]
    phrases: Vec<String>,
    #[serde(default)]
    contexts: BTreeSet<TagId>,
    #[serde(default)]
    red_flags: BTreeSet<TagId>,
    incubation: Option<String>,
    transmission: Option<String>,
    #[serde(default)]
    key_tests: Vec<String>,
    typical_course: Option<String>,
    #[serde(default)]
    prevention: Vec<String>,
    #[serde(default)]
    home_care: Vec<String>,
    clinician_notes: Option<Vec<String>>,
    #[serde(default)]
    avoid: Vec<String>,
}

fn wire_to_domain(wire: KnowledgeBaseWire) -> KnowledgeDocument {
    let vocabulary = Vocabulary {
        symptoms: wire.vocabulary.symptoms,
        exposures: wire.vocabulary.exposures,
        flags: wire.vocabulary.flags,
        comorbidities: wire.vocabulary.comorbidities,
    };

    let diseases = wire
        .diseases
        .into_iter()
        .map(|d| DiseaseRecord {
            name: d.name,
            aliases: d.aliases,
            symptoms: d.symptoms,
            phrases: d.phrases,
            contexts: d.contexts,
            red_flags: d.red_flags,
            incubation: d.incubation,
            transmission: d.transmission,
            key_tests: d.key_tests,
            typical_course: d.typical_course,
            prevention: d.prevention,
            home_care: d.home_care,
            clinician_notes: d.clinician_notes.filter(|notes| !notes.is_empty()),
            avoid: d.avoid,
        })
        .collect();

    KnowledgeDocument {
        vocabulary,
        general_red_flags: wire.general_red_flags,
        disclaimer: wire.disclaimer,
        diseases,
    }
}
