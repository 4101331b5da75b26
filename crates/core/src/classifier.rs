//! Triage classification.
//!
//! Urgency is decided by an ordered ladder of guards. The first guard whose predicate holds
//! selects the band; signals are never summed or averaged. The last guard always matches, so
//! every input maps to exactly one band.

use crate::constants::{
    COUGH, FEVER, MODERATE_DEHYDRATION, PROMPT_VISIT_COMORBIDITIES, RED_FLAG_SYMPTOMS,
    SEVERE_DEHYDRATION, SHORTNESS_BREATH, URGENT_DEHYDRATION_DAYS, URGENT_FEVER_DAYS,
};
use crate::{TriageError, TriageResult};
use knowledge::{TagSection, Vocabulary};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use triage_types::TagId;

/// Urgency bands, most severe first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyBand {
    Emergency,
    Urgent,
    PromptClinicVisit,
    HomeCare,
}

impl UrgencyBand {
    pub fn label(&self) -> &'static str {
        match self {
            UrgencyBand::Emergency => "Emergency",
            UrgencyBand::Urgent => "Urgent (same-day/24h)",
            UrgencyBand::PromptClinicVisit => "Prompt clinic visit (48h)",
            UrgencyBand::HomeCare => "Home care with monitoring",
        }
    }
}

impl fmt::Display for UrgencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The facts a guard predicate can inspect.
#[derive(Clone, Copy, Debug)]
pub struct TriageInput<'a> {
    pub symptoms: &'a BTreeSet<TagId>,
    pub flags: &'a BTreeMap<TagId, bool>,
    pub days_sick: u32,
    pub comorbid_count: u32,
}

impl TriageInput<'_> {
    fn has_symptom(&self, tag: &str) -> bool {
        self.symptoms.contains(tag)
    }

    fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}

/// One rung of the triage ladder.
pub struct Guard {
    /// Stable identifier for audit output.
    pub id: &'static str,
    pub band: UrgencyBand,
    pub advice: &'static [&'static str],
    predicate: fn(&TriageInput<'_>) -> bool,
}

impl Guard {
    pub fn matches(&self, input: &TriageInput<'_>) -> bool {
        (self.predicate)(input)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("id", &self.id)
            .field("band", &self.band)
            .finish()
    }
}

fn emergency(input: &TriageInput<'_>) -> bool {
    RED_FLAG_SYMPTOMS.iter().any(|tag| input.has_symptom(tag)) || input.flag(SEVERE_DEHYDRATION)
}

fn urgent(input: &TriageInput<'_>) -> bool {
    // Shortness of breath is also a red flag; it stays here so this rung stands alone.
    (input.has_symptom(FEVER) && input.days_sick >= URGENT_FEVER_DAYS)
        || input.has_symptom(SHORTNESS_BREATH)
        || (input.flag(MODERATE_DEHYDRATION) && input.days_sick >= URGENT_DEHYDRATION_DAYS)
}

fn prompt_clinic_visit(input: &TriageInput<'_>) -> bool {
    input.comorbid_count >= PROMPT_VISIT_COMORBIDITIES
        && (input.has_symptom(FEVER) || input.has_symptom(COUGH))
}

fn always(_: &TriageInput<'_>) -> bool {
    true
}

/// The triage ladder in precedence order.
pub static LADDER: [Guard; 4] = [
    Guard {
        id: "emergency",
        band: UrgencyBand::Emergency,
        advice: &[
            "Seek emergency care (ER) immediately.",
            "Do not delay: call local emergency services if you cannot travel safely.",
        ],
        predicate: emergency,
    },
    Guard {
        id: "urgent",
        band: UrgencyBand::Urgent,
        advice: &[
            "Arrange an in-person evaluation within 24 hours.",
            "Escalate to emergency care if symptoms worsen.",
        ],
        predicate: urgent,
    },
    Guard {
        id: "prompt_clinic_visit",
        band: UrgencyBand::PromptClinicVisit,
        advice: &[
            "Book a clinic visit within 48 hours.",
            "Monitor symptoms closely in the meantime.",
        ],
        predicate: prompt_clinic_visit,
    },
    Guard {
        id: "home_care",
        band: UrgencyBand::HomeCare,
        advice: &[
            "Rest, drink fluids and monitor your symptoms.",
            "Seek care if new red flags appear or symptoms persist.",
        ],
        predicate: always,
    },
];

/// The band chosen for one evaluation and the advice that goes with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TriageOutcome {
    pub band: UrgencyBand,
    /// Identifier of the guard that fired.
    pub guard: &'static str,
    pub advice: Vec<String>,
}

/// Classify a case into exactly one urgency band.
pub fn classify(
    symptoms: &BTreeSet<TagId>,
    flags: &BTreeMap<TagId, bool>,
    days_sick: u32,
    comorbid_count: u32,
) -> TriageOutcome {
    let input = TriageInput {
        symptoms,
        flags,
        days_sick,
        comorbid_count,
    };

    let fallback = &LADDER[LADDER.len() - 1];
    let guard = LADDER
        .iter()
        .find(|guard| guard.matches(&input))
        .unwrap_or(fallback);

    tracing::debug!(guard = guard.id, band = %guard.band, "classified case");

    TriageOutcome {
        band: guard.band,
        guard: guard.id,
        advice: guard.advice.iter().map(|line| line.to_string()).collect(),
    }
}

/// Check that every tag and flag the ladder refers to exists in `vocabulary`.
///
/// A knowledge base missing one of these would silently disable a guard, so this is a
/// configuration error.
pub fn validate_classifier_vocabulary(vocabulary: &Vocabulary) -> TriageResult<()> {
    let symptoms = RED_FLAG_SYMPTOMS
        .into_iter()
        .chain([FEVER, COUGH, SHORTNESS_BREATH]);
    for tag in symptoms {
        if !vocabulary.contains(TagSection::Symptom, tag) {
            return Err(TriageError::Configuration(format!(
                "triage classifier requires symptom tag '{tag}' in the vocabulary"
            )));
        }
    }

    for flag in [SEVERE_DEHYDRATION, MODERATE_DEHYDRATION] {
        if !vocabulary.contains(TagSection::Flag, flag) {
            return Err(TriageError::Configuration(format!(
                "triage classifier requires flag '{flag}' in the vocabulary"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> BTreeSet<TagId> {
        values
            .iter()
            .map(|v| TagId::new(v).expect("valid tag"))
            .collect()
    }

    fn flags(values: &[(&str, bool)]) -> BTreeMap<TagId, bool> {
        values
            .iter()
            .map(|(k, v)| (TagId::new(k).expect("valid flag"), *v))
            .collect()
    }

    fn guard(id: &str) -> &'static Guard {
        LADDER
            .iter()
            .find(|g| g.id == id)
            .expect("guard exists")
    }

    #[test]
    fn ladder_is_ordered_most_severe_first() {
        let bands: Vec<UrgencyBand> = LADDER.iter().map(|g| g.band).collect();
        let mut sorted = bands.clone();
        sorted.sort();
        assert_eq!(bands, sorted);
        assert_eq!(bands.first(), Some(&UrgencyBand::Emergency));
        assert_eq!(bands.last(), Some(&UrgencyBand::HomeCare));
    }

    #[test]
    fn confusion_is_always_an_emergency() {
        let outcome = classify(&tags(&["confusion"]), &BTreeMap::new(), 0, 0);
        assert_eq!(outcome.band, UrgencyBand::Emergency);
        assert_eq!(outcome.guard, "emergency");

        let outcome = classify(&tags(&["confusion", "fever", "cough"]), &BTreeMap::new(), 9, 5);
        assert_eq!(outcome.band, UrgencyBand::Emergency);
    }

    #[test]
    fn every_red_flag_triggers_emergency() {
        for tag in RED_FLAG_SYMPTOMS {
            let outcome = classify(&tags(&[tag]), &BTreeMap::new(), 0, 0);
            assert_eq!(outcome.band, UrgencyBand::Emergency, "red flag {tag}");
        }
    }

    #[test]
    fn severe_dehydration_alone_is_an_emergency() {
        let outcome = classify(
            &BTreeSet::new(),
            &flags(&[(SEVERE_DEHYDRATION, true)]),
            0,
            0,
        );
        assert_eq!(outcome.band, UrgencyBand::Emergency);

        let outcome = classify(
            &BTreeSet::new(),
            &flags(&[(SEVERE_DEHYDRATION, false)]),
            0,
            0,
        );
        assert_eq!(outcome.band, UrgencyBand::HomeCare);
    }

    #[test]
    fn empty_input_falls_back_to_home_care() {
        let outcome = classify(&BTreeSet::new(), &BTreeMap::new(), 0, 0);
        assert_eq!(outcome.band, UrgencyBand::HomeCare);
        assert_eq!(outcome.band.label(), "Home care with monitoring");
        assert!(!outcome.advice.is_empty());
    }

    #[test]
    fn fever_for_three_days_is_urgent() {
        let symptoms = tags(&["fever"]);
        assert_eq!(
            classify(&symptoms, &BTreeMap::new(), 2, 0).band,
            UrgencyBand::HomeCare
        );
        assert_eq!(
            classify(&symptoms, &BTreeMap::new(), 3, 0).band,
            UrgencyBand::Urgent
        );
    }

    #[test]
    fn moderate_dehydration_needs_a_day_to_be_urgent() {
        let moderate = flags(&[(MODERATE_DEHYDRATION, true)]);
        assert_eq!(
            classify(&BTreeSet::new(), &moderate, 0, 0).band,
            UrgencyBand::HomeCare
        );
        assert_eq!(
            classify(&BTreeSet::new(), &moderate, 1, 0).band,
            UrgencyBand::Urgent
        );
    }

    #[test]
    fn fever_with_two_comorbidities_needs_prompt_visit() {
        let outcome = classify(&tags(&["fever"]), &BTreeMap::new(), 0, 2);
        assert_eq!(outcome.band, UrgencyBand::PromptClinicVisit);
        assert_eq!(outcome.band.label(), "Prompt clinic visit (48h)");

        let outcome = classify(&tags(&["cough"]), &BTreeMap::new(), 0, 3);
        assert_eq!(outcome.band, UrgencyBand::PromptClinicVisit);

        let outcome = classify(&tags(&["rash"]), &BTreeMap::new(), 0, 3);
        assert_eq!(outcome.band, UrgencyBand::HomeCare);

        let outcome = classify(&tags(&["fever"]), &BTreeMap::new(), 0, 1);
        assert_eq!(outcome.band, UrgencyBand::HomeCare);
    }

    #[test]
    fn urgent_outranks_prompt_visit() {
        let outcome = classify(&tags(&["fever"]), &BTreeMap::new(), 4, 2);
        assert_eq!(outcome.band, UrgencyBand::Urgent);
    }

    #[test]
    fn urgent_guard_covers_shortness_of_breath_on_its_own() {
        let symptoms = tags(&["shortness_breath"]);
        let input = TriageInput {
            symptoms: &symptoms,
            flags: &BTreeMap::new(),
            days_sick: 0,
            comorbid_count: 0,
        };
        assert!(guard("urgent").matches(&input));
        assert!(guard("emergency").matches(&input));
        assert!(!guard("prompt_clinic_visit").matches(&input));
        assert!(guard("home_care").matches(&input));
    }

    #[test]
    fn classification_is_deterministic() {
        let symptoms = tags(&["fever", "cough"]);
        let moderate = flags(&[(MODERATE_DEHYDRATION, true)]);
        assert_eq!(
            classify(&symptoms, &moderate, 2, 2),
            classify(&symptoms, &moderate, 2, 2)
        );
    }

    #[test]
    fn builtin_vocabulary_covers_the_ladder() {
        let kb = knowledge::KnowledgeBase::builtin().expect("builtin kb");
        validate_classifier_vocabulary(kb.vocabulary()).expect("ladder tags declared");
    }

    #[test]
    fn missing_flag_in_vocabulary_is_a_configuration_error() {
        let kb = knowledge::KnowledgeBase::builtin().expect("builtin kb");
        let mut vocabulary = kb.vocabulary().clone();
        vocabulary.flags.remove(MODERATE_DEHYDRATION);
        let err = validate_classifier_vocabulary(&vocabulary).expect_err("missing flag");
        assert!(
            matches!(err, TriageError::Configuration(msg) if msg.contains(MODERATE_DEHYDRATION))
        );
    }
}
