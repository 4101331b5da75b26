//! The immutable disease registry.
//!
//! A [`KnowledgeBase`] is built once at start-up (from the embedded YAML, a file, or records
//! assembled in code) and then shared read-only. Canonical names and aliases live in a single
//! case-insensitive namespace.

use crate::wire;
use crate::{
    DiseaseRecord, KnowledgeError, KnowledgeResult, TagSection, Vocabulary,
    BUILTIN_KNOWLEDGE_BASE,
};
use std::collections::HashMap;
use std::path::Path;

/// Validated, read-only collection of disease records.
#[derive(Clone, Debug)]
pub struct KnowledgeBase {
    vocabulary: Vocabulary,
    records: Vec<DiseaseRecord>,
    index: HashMap<String, usize>,
    general_red_flags: Vec<String>,
    disclaimer: Vec<String>,
}

impl KnowledgeBase {
    /// Build a knowledge base from already-constructed parts.
    ///
    /// # Errors
    ///
    /// Returns [`KnowledgeError`] if:
    /// - `records` is empty,
    /// - two records claim the same name or alias (compared case-insensitively),
    /// - any symptom, context or red-flag tag is missing from `vocabulary`.
    pub fn new(
        vocabulary: Vocabulary,
        records: Vec<DiseaseRecord>,
        general_red_flags: Vec<String>,
        disclaimer: Vec<String>,
    ) -> KnowledgeResult<Self> {
        if records.is_empty() {
            return Err(KnowledgeError::InvalidInput(
                "knowledge base must contain at least one disease".into(),
            ));
        }

        for record in &records {
            validate_tags(&vocabulary, record)?;
        }

        let mut index: HashMap<String, usize> = HashMap::new();
        for (position, record) in records.iter().enumerate() {
            for name in record.names() {
                let key = normalise_key(name);
                match index.get(&key) {
                    Some(&existing) if existing == position => {}
                    Some(&existing) => {
                        return Err(KnowledgeError::DuplicateName {
                            name: name.to_string(),
                            first: records[existing].name().to_string(),
                            second: record.name().to_string(),
                        });
                    }
                    None => {
                        index.insert(key, position);
                    }
                }
            }
        }

        tracing::info!(
            diseases = records.len(),
            names = index.len(),
            symptoms = vocabulary.symptoms.len(),
            exposures = vocabulary.exposures.len(),
            "knowledge base loaded"
        );

        Ok(Self {
            vocabulary,
            records,
            index,
            general_red_flags,
            disclaimer,
        })
    }

    /// Load the knowledge base embedded in this crate.
    pub fn builtin() -> KnowledgeResult<Self> {
        Self::from_yaml(BUILTIN_KNOWLEDGE_BASE)
    }

    /// Parse and validate a knowledge base YAML document.
    pub fn from_yaml(yaml_text: &str) -> KnowledgeResult<Self> {
        let doc = wire::parse(yaml_text)?;
        Self::new(
            doc.vocabulary,
            doc.diseases,
            doc.general_red_flags,
            doc.disclaimer,
        )
    }

    /// Read, parse and validate a knowledge base YAML file.
    pub fn from_path(path: &Path) -> KnowledgeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| KnowledgeError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "reading knowledge base file");
        Self::from_yaml(&text)
    }

    /// Find a record by canonical name or alias, ignoring case and surrounding whitespace.
    ///
    /// An alias resolves to the same record reference as its canonical name.
    pub fn lookup(&self, name_or_alias: &str) -> Option<&DiseaseRecord> {
        self.index
            .get(&normalise_key(name_or_alias))
            .map(|&position| &self.records[position])
    }

    /// All records in declaration order.
    pub fn records(&self) -> &[DiseaseRecord] {
        &self.records
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn general_red_flags(&self) -> &[String] {
        &self.general_red_flags
    }

    pub fn disclaimer(&self) -> &[String] {
        &self.disclaimer
    }
}

fn normalise_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn validate_tags(vocabulary: &Vocabulary, record: &DiseaseRecord) -> KnowledgeResult<()> {
    let sections = [
        (TagSection::Symptom, &record.symptoms),
        (TagSection::Exposure, &record.contexts),
        (TagSection::RedFlag, &record.red_flags),
    ];

    for (section, tags) in sections {
        if let Some(tag) = tags
            .iter()
            .find(|tag| !vocabulary.contains(section, tag.as_str()))
        {
            return Err(KnowledgeError::UnknownTag {
                disease: record.name().to_string(),
                section,
                tag: tag.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::io::Write;
    use triage_types::{NonEmptyText, TagId};

    fn tags(values: &[&str]) -> BTreeSet<TagId> {
        values
            .iter()
            .map(|v| TagId::new(v).expect("valid tag"))
            .collect()
    }

    fn vocabulary() -> Vocabulary {
        let mut vocabulary = Vocabulary::default();
        for symptom in ["fever", "cough", "rash"] {
            vocabulary.symptoms.insert(
                TagId::new(symptom).expect("tag"),
                NonEmptyText::new(symptom).expect("label"),
            );
        }
        vocabulary.exposures.insert(
            TagId::new("outbreak_local").expect("tag"),
            NonEmptyText::new("outbreak reported locally").expect("label"),
        );
        vocabulary
    }

    fn record(name: &str, aliases: &[&str], symptoms: &[&str]) -> DiseaseRecord {
        DiseaseRecord {
            name: NonEmptyText::new(name).expect("name"),
            aliases: aliases
                .iter()
                .map(|a| NonEmptyText::new(a).expect("alias"))
                .collect(),
            symptoms: tags(symptoms),
            phrases: Vec::new(),
            contexts: BTreeSet::new(),
            red_flags: BTreeSet::new(),
            incubation: None,
            transmission: None,
            key_tests: Vec::new(),
            typical_course: None,
            prevention: Vec::new(),
            home_care: Vec::new(),
            clinician_notes: None,
            avoid: Vec::new(),
        }
    }

    #[test]
    fn builtin_knowledge_base_loads() {
        let kb = KnowledgeBase::builtin().expect("builtin kb must be valid");
        let names: Vec<&str> = kb.records().iter().map(DiseaseRecord::name).collect();
        assert_eq!(
            names,
            vec!["COVID-19", "Influenza", "Dengue", "Malaria", "Cholera", "Measles"]
        );
        assert!(!kb.general_red_flags().is_empty());
        assert!(!kb.disclaimer().is_empty());
    }

    #[test]
    fn alias_and_canonical_name_resolve_to_same_record() {
        let kb = KnowledgeBase::builtin().expect("builtin kb");
        let by_alias = kb.lookup("flu").expect("alias");
        let by_name = kb.lookup("Influenza").expect("name");
        assert!(std::ptr::eq(by_alias, by_name));
        assert_eq!(by_alias.name(), "Influenza");
    }

    #[test]
    fn lookup_is_case_insensitive_and_trimmed() {
        let kb = KnowledgeBase::builtin().expect("builtin kb");
        let covid = kb.lookup("  SARS-CoV-2 ").expect("alias");
        assert_eq!(covid.name(), "COVID-19");
        assert!(std::ptr::eq(covid, kb.lookup("covid-19").expect("name")));
        assert!(kb.lookup("ebola").is_none());
    }

    #[test]
    fn records_are_in_stable_declaration_order() {
        let kb = KnowledgeBase::builtin().expect("builtin kb");
        let first: Vec<&str> = kb.records().iter().map(DiseaseRecord::name).collect();
        let second: Vec<&str> = kb.records().iter().map(DiseaseRecord::name).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_duplicate_alias_across_records() {
        let records = vec![
            record("Influenza", &["flu"], &["fever"]),
            record("Avian influenza", &["FLU"], &["fever"]),
        ];
        let err = KnowledgeBase::new(vocabulary(), records, Vec::new(), Vec::new())
            .expect_err("duplicate alias must be fatal");
        match err {
            KnowledgeError::DuplicateName {
                name,
                first,
                second,
            } => {
                assert_eq!(name, "FLU");
                assert_eq!(first, "Influenza");
                assert_eq!(second, "Avian influenza");
            }
            other => panic!("expected DuplicateName, got {other:?}"),
        }
    }

    #[test]
    fn rejects_alias_clashing_with_another_canonical_name() {
        let records = vec![
            record("Measles", &[], &["rash"]),
            record("Rubella", &["measles"], &["rash"]),
        ];
        let err = KnowledgeBase::new(vocabulary(), records, Vec::new(), Vec::new())
            .expect_err("clash must be fatal");
        assert!(matches!(err, KnowledgeError::DuplicateName { .. }));
    }

    #[test]
    fn alias_equal_to_own_name_is_permitted() {
        let records = vec![record("Influenza", &["influenza", "flu"], &["fever"])];
        let kb = KnowledgeBase::new(vocabulary(), records, Vec::new(), Vec::new())
            .expect("self alias is fine");
        assert_eq!(kb.records().len(), 1);
    }

    #[test]
    fn rejects_symptom_outside_vocabulary() {
        let records = vec![record("Influenza", &[], &["fever", "sneezing"])];
        let err = KnowledgeBase::new(vocabulary(), records, Vec::new(), Vec::new())
            .expect_err("unknown tag must be fatal");
        match err {
            KnowledgeError::UnknownTag {
                disease,
                section,
                tag,
            } => {
                assert_eq!(disease, "Influenza");
                assert_eq!(section, TagSection::Symptom);
                assert_eq!(tag, "sneezing");
            }
            other => panic!("expected UnknownTag, got {other:?}"),
        }
    }

    #[test]
    fn rejects_symptom_used_as_context() {
        let mut flu = record("Influenza", &[], &["fever"]);
        flu.contexts = tags(&["cough"]);
        let err = KnowledgeBase::new(vocabulary(), vec![flu], Vec::new(), Vec::new())
            .expect_err("sections are not interchangeable");
        assert!(matches!(
            err,
            KnowledgeError::UnknownTag {
                section: TagSection::Exposure,
                ..
            }
        ));
    }

    #[test]
    fn rejects_empty_disease_list() {
        let err = KnowledgeBase::new(vocabulary(), Vec::new(), Vec::new(), Vec::new())
            .expect_err("empty kb");
        assert!(matches!(err, KnowledgeError::InvalidInput(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(
            b"vocabulary:\n  symptoms:\n    fever: fever\ndiseases:\n  - name: Influenza\n    aliases: [flu]\n    symptoms: [fever]\n",
        )
        .expect("write");

        let kb = KnowledgeBase::from_path(file.path()).expect("load from file");
        assert_eq!(kb.lookup("flu").map(DiseaseRecord::name), Some("Influenza"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = KnowledgeBase::from_path(Path::new("/definitely/not/here.yaml"))
            .expect_err("missing file");
        assert!(matches!(err, KnowledgeError::FileRead { .. }));
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}
