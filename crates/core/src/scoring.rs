//! Structured-tag scoring.
//!
//! Each disease gets a raw overlap score against the selected tags, with a symptom match
//! worth twice an exposure match. Raw scores are then normalised so the best match reads 100.

use knowledge::{DiseaseRecord, KnowledgeBase};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use triage_types::TagId;

/// Weight of one matching symptom tag.
pub const SYMPTOM_WEIGHT: usize = 2;

/// Weight of one matching exposure/context tag.
pub const EXPOSURE_WEIGHT: usize = 1;

/// Score of one disease against a selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiseaseScore {
    pub name: String,
    pub raw: usize,
    /// Raw score relative to the best raw score, in `0..=100`.
    pub percentage: u8,
}

/// Scores for every disease in the knowledge base, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    scores: Vec<DiseaseScore>,
    max_raw: usize,
}

impl ScoreResult {
    /// Scores in knowledge base declaration order.
    pub fn scores(&self) -> &[DiseaseScore] {
        &self.scores
    }

    /// Best raw score across all diseases.
    pub fn max_raw(&self) -> usize {
        self.max_raw
    }

    /// Scores ordered by descending percentage. Ties keep declaration order.
    pub fn ranked(&self) -> Vec<&DiseaseScore> {
        let mut ranked: Vec<&DiseaseScore> = self.scores.iter().collect();
        ranked.sort_by(|a, b| b.percentage.cmp(&a.percentage));
        ranked
    }

    /// Percentage for a disease by canonical name, ignoring case.
    pub fn percentage(&self, name: &str) -> Option<u8> {
        self.scores
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
            .map(|s| s.percentage)
    }

    /// Name to percentage mapping.
    pub fn to_map(&self) -> BTreeMap<String, u8> {
        self.scores
            .iter()
            .map(|s| (s.name.clone(), s.percentage))
            .collect()
    }
}

/// Raw weighted overlap of one record with the selected tags.
///
/// Tags the record does not know simply do not overlap, so unrecognised selections contribute 0.
pub fn raw_score(
    record: &DiseaseRecord,
    symptoms: &BTreeSet<TagId>,
    exposures: &BTreeSet<TagId>,
) -> usize {
    let symptom_hits = record.symptoms.intersection(symptoms).count();
    let exposure_hits = record.contexts.intersection(exposures).count();
    SYMPTOM_WEIGHT * symptom_hits + EXPOSURE_WEIGHT * exposure_hits
}

/// Scores every disease in `kb` against the selected symptoms and exposures.
///
/// Percentages are `round(100 * raw / max_raw)` with halves rounded up. When no disease
/// overlaps at all every percentage is 0.
pub fn compute_scores(
    kb: &KnowledgeBase,
    symptoms: &BTreeSet<TagId>,
    exposures: &BTreeSet<TagId>,
) -> ScoreResult {
    let raws: Vec<(&DiseaseRecord, usize)> = kb
        .records()
        .iter()
        .map(|record| (record, raw_score(record, symptoms, exposures)))
        .collect();

    let max_raw = raws.iter().map(|(_, raw)| *raw).max().unwrap_or(0);

    let scores = raws
        .into_iter()
        .map(|(record, raw)| DiseaseScore {
            name: record.name().to_string(),
            raw,
            percentage: to_percentage(raw, max_raw),
        })
        .collect();

    tracing::debug!(max_raw, "computed disease scores");

    ScoreResult { scores, max_raw }
}

fn to_percentage(raw: usize, max_raw: usize) -> u8 {
    if max_raw == 0 {
        return 0;
    }
    let rounded = (200 * raw + max_raw) / (2 * max_raw);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use knowledge::Vocabulary;
    use triage_types::NonEmptyText;

    fn tag(value: &str) -> TagId {
        TagId::new(value).expect("valid tag")
    }

    fn tags(values: &[&str]) -> BTreeSet<TagId> {
        values.iter().map(|v| tag(v)).collect()
    }

    fn record(name: &str, symptoms: &[&str], contexts: &[&str]) -> DiseaseRecord {
        DiseaseRecord {
            name: NonEmptyText::new(name).expect("name"),
            aliases: Vec::new(),
            symptoms: tags(symptoms),
            phrases: Vec::new(),
            contexts: tags(contexts),
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

    fn small_kb() -> KnowledgeBase {
        let mut vocabulary = Vocabulary::default();
        for symptom in ["fever", "cough", "rash", "chills"] {
            vocabulary
                .symptoms
                .insert(tag(symptom), NonEmptyText::new(symptom).expect("label"));
        }
        for exposure in ["outbreak_local", "mosquito_bites"] {
            vocabulary
                .exposures
                .insert(tag(exposure), NonEmptyText::new(exposure).expect("label"));
        }
        KnowledgeBase::new(
            vocabulary,
            vec![
                record("Alpha", &["fever", "cough"], &["outbreak_local"]),
                record("Beta", &["rash"], &["mosquito_bites"]),
                record("Gamma", &["fever", "cough", "chills"], &["outbreak_local"]),
            ],
            Vec::new(),
            Vec::new(),
        )
        .expect("valid kb")
    }

    #[test]
    fn symptom_match_weighs_double_an_exposure_match() {
        let alpha = record("Alpha", &["fever", "cough"], &["outbreak_local"]);
        assert_eq!(raw_score(&alpha, &tags(&["fever"]), &BTreeSet::new()), 2);
        assert_eq!(
            raw_score(&alpha, &BTreeSet::new(), &tags(&["outbreak_local"])),
            1
        );
    }

    #[test]
    fn unknown_tags_contribute_nothing() {
        let alpha = record("Alpha", &["fever", "cough"], &["outbreak_local"]);
        assert_eq!(
            raw_score(&alpha, &tags(&["hiccups"]), &tags(&["space_travel"])),
            0
        );
    }

    #[test]
    fn empty_selection_scores_zero_everywhere() {
        let kb = small_kb();
        let result = compute_scores(&kb, &BTreeSet::new(), &BTreeSet::new());
        assert_eq!(result.max_raw(), 0);
        assert!(result.scores().iter().all(|s| s.percentage == 0));
        assert_eq!(result.scores().len(), 3);
    }

    #[test]
    fn best_match_reaches_one_hundred() {
        let kb = small_kb();
        let result = compute_scores(&kb, &tags(&["fever", "chills"]), &BTreeSet::new());
        // Alpha = 2, Beta = 0, Gamma = 4
        assert_eq!(result.max_raw(), 4);
        assert_eq!(result.percentage("gamma"), Some(100));
        assert_eq!(result.percentage("Alpha"), Some(50));
        assert_eq!(result.percentage("Beta"), Some(0));
        assert_eq!(result.percentage("Delta"), None);
    }

    #[test]
    fn tied_leaders_both_read_one_hundred() {
        let kb = small_kb();
        let result = compute_scores(&kb, &tags(&["fever", "cough"]), &tags(&["outbreak_local"]));
        assert_eq!(result.percentage("Alpha"), Some(100));
        assert_eq!(result.percentage("Gamma"), Some(100));
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(to_percentage(1, 8), 13);
        assert_eq!(to_percentage(1, 3), 33);
        assert_eq!(to_percentage(2, 3), 67);
        assert_eq!(to_percentage(5, 5), 100);
        assert_eq!(to_percentage(0, 5), 0);
    }

    #[test]
    fn ranking_is_descending_with_declaration_order_for_ties() {
        let kb = small_kb();
        let result = compute_scores(&kb, &tags(&["fever", "cough"]), &BTreeSet::new());
        let names: Vec<&str> = result.ranked().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Gamma", "Beta"]);

        let none = compute_scores(&kb, &BTreeSet::new(), &BTreeSet::new());
        let names: Vec<&str> = none.ranked().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn scoring_is_deterministic_and_bounded_on_builtin_kb() {
        let kb = KnowledgeBase::builtin().expect("builtin kb");
        let symptoms = tags(&["fever", "rash", "vomiting", "cough"]);
        let exposures = tags(&["mosquito_bites", "unvaccinated"]);

        let first = compute_scores(&kb, &symptoms, &exposures);
        let second = compute_scores(&kb, &symptoms, &exposures);
        assert_eq!(first, second);
        assert!(first.scores().iter().all(|s| s.percentage <= 100));
        assert!(first.scores().iter().any(|s| s.percentage == 100));
        assert_eq!(first.to_map().len(), kb.records().len());
    }
}
