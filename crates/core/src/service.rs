//! Assessment facade.
//!
//! [`TriageService`] ties the knowledge base, the scoring engine and the classifier together for
//! presentation layers. It holds only shared read-only state, so one instance can serve any
//! number of concurrent requests.

use crate::classifier::{classify, validate_classifier_vocabulary, TriageOutcome};
use crate::config::CoreConfig;
use crate::matcher::{score_by_text, TextMatch};
use crate::scoring::{compute_scores, DiseaseScore};
use crate::selection::SelectionSet;
use crate::validation::validate_selection;
use crate::TriageResult;
use knowledge::{DiseaseRecord, KnowledgeBase};
use serde::Serialize;
use std::sync::Arc;
use triage_types::TagId;

/// Display payload for one of the best-matching conditions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConditionSummary {
    pub name: String,
    pub percentage: u8,
    pub prevention: Vec<String>,
    pub home_care: Vec<String>,
    pub clinician_notes: Option<Vec<String>>,
    pub avoid: Vec<String>,
    /// Disease-specific red flags that are among the selected symptoms.
    pub red_flags_present: Vec<TagId>,
}

/// Full result of one evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Assessment {
    /// Best matches with a non-zero percentage, at most `top_n` of them.
    pub top_conditions: Vec<ConditionSummary>,
    /// Every disease, ranked by descending percentage.
    pub scores: Vec<DiseaseScore>,
    pub triage: TriageOutcome,
    /// Entries dropped under the `ignore` unknown-tag policy.
    pub ignored: Vec<String>,
}

/// Pure assessment operations over a loaded knowledge base.
#[derive(Clone, Debug)]
pub struct TriageService {
    kb: Arc<KnowledgeBase>,
    cfg: Arc<CoreConfig>,
}

impl TriageService {
    /// Creates a new `TriageService`.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Configuration` if the knowledge base vocabulary lacks a tag or flag
    /// the classifier depends on.
    pub fn new(kb: Arc<KnowledgeBase>, cfg: Arc<CoreConfig>) -> TriageResult<Self> {
        validate_classifier_vocabulary(kb.vocabulary())?;
        Ok(Self { kb, cfg })
    }

    /// Load the knowledge base named by `cfg` and build a service around it.
    pub fn from_config(cfg: CoreConfig) -> TriageResult<Self> {
        let kb = cfg.load_knowledge_base()?;
        Self::new(Arc::new(kb), Arc::new(cfg))
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Find a disease by canonical name or alias.
    pub fn lookup(&self, name_or_alias: &str) -> Option<&DiseaseRecord> {
        self.kb.lookup(name_or_alias)
    }

    /// Rank diseases against a free-text description.
    pub fn match_text(&self, text: &str, top_k: usize) -> Vec<TextMatch<'_>> {
        score_by_text(&self.kb, text, top_k)
    }

    /// Score and classify a selection.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidInput` if the selection fails validation under the
    /// configured unknown-tag policy.
    pub fn assess(&self, selection: &SelectionSet) -> TriageResult<Assessment> {
        let validated =
            validate_selection(self.kb.vocabulary(), selection, self.cfg.unknown_tag_policy())?;
        let selection = &validated.selection;

        let scores = compute_scores(&self.kb, &selection.symptoms, &selection.exposures);

        let top_conditions = scores
            .ranked()
            .into_iter()
            .filter(|score| score.percentage > 0)
            .take(self.cfg.top_n())
            .filter_map(|score| {
                self.kb
                    .lookup(&score.name)
                    .map(|record| summarise(record, score.percentage, selection))
            })
            .collect();

        let triage = classify(
            &selection.symptoms,
            &selection.flags,
            selection.days_sick,
            selection.comorbid_count(),
        );

        tracing::info!(
            band = %triage.band,
            symptoms = selection.symptoms.len(),
            exposures = selection.exposures.len(),
            "assessment complete"
        );

        Ok(Assessment {
            top_conditions,
            scores: scores.ranked().into_iter().cloned().collect(),
            triage,
            ignored: validated.ignored,
        })
    }
}

fn summarise(record: &DiseaseRecord, percentage: u8, selection: &SelectionSet) -> ConditionSummary {
    ConditionSummary {
        name: record.name().to_string(),
        percentage,
        prevention: record.prevention.clone(),
        home_care: record.home_care.clone(),
        clinician_notes: record.clinician_notes.clone(),
        avoid: record.avoid.clone(),
        red_flags_present: record
            .red_flags
            .intersection(&selection.symptoms)
            .cloned()
            .collect(),
    }
}
