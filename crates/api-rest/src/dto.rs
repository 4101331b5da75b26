//! JSON request and response bodies.
//!
//! These mirror the core result types with OpenAPI schemas attached. Tag fields are plain strings
//! on the wire and are parsed into tag identifiers by the handlers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use triage_core::{Assessment, ConditionSummary, DiseaseRecord, DiseaseScore, TriageOutcome};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DiseaseSummaryRes {
    pub name: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListDiseasesRes {
    pub diseases: Vec<DiseaseSummaryRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DiseaseRes {
    pub name: String,
    pub aliases: Vec<String>,
    pub symptoms: Vec<String>,
    pub phrases: Vec<String>,
    pub contexts: Vec<String>,
    pub red_flags: Vec<String>,
    pub incubation: Option<String>,
    pub transmission: Option<String>,
    pub key_tests: Vec<String>,
    pub typical_course: Option<String>,
    pub prevention: Vec<String>,
    pub home_care: Vec<String>,
    pub clinician_notes: Option<Vec<String>>,
    pub avoid: Vec<String>,
}

impl From<&DiseaseRecord> for DiseaseRes {
    fn from(record: &DiseaseRecord) -> Self {
        Self {
            name: record.name().to_string(),
            aliases: record.aliases.iter().map(|a| a.to_string()).collect(),
            symptoms: record.symptoms.iter().map(|t| t.to_string()).collect(),
            phrases: record.phrases.clone(),
            contexts: record.contexts.iter().map(|t| t.to_string()).collect(),
            red_flags: record.red_flags.iter().map(|t| t.to_string()).collect(),
            incubation: record.incubation.clone(),
            transmission: record.transmission.clone(),
            key_tests: record.key_tests.clone(),
            typical_course: record.typical_course.clone(),
            prevention: record.prevention.clone(),
            home_care: record.home_care.clone(),
            clinician_notes: record.clinician_notes.clone(),
            avoid: record.avoid.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VocabularyRes {
    pub symptoms: BTreeMap<String, String>,
    pub exposures: BTreeMap<String, String>,
    pub flags: BTreeMap<String, String>,
    pub comorbidities: BTreeMap<String, String>,
    pub general_red_flags: Vec<String>,
    pub disclaimer: Vec<String>,
}

/// Selection submitted for assessment. Counts must be non-negative.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AssessReq {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub exposures: Vec<String>,
    /// Severity flags by name, for example `{"moderate_dehydration": true}`.
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub days_sick: u32,
    #[serde(default)]
    pub comorbidities: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConditionRes {
    pub name: String,
    pub percentage: u8,
    pub prevention: Vec<String>,
    pub home_care: Vec<String>,
    pub clinician_notes: Option<Vec<String>>,
    pub avoid: Vec<String>,
    pub red_flags_present: Vec<String>,
}

impl From<ConditionSummary> for ConditionRes {
    fn from(c: ConditionSummary) -> Self {
        Self {
            name: c.name,
            percentage: c.percentage,
            prevention: c.prevention,
            home_care: c.home_care,
            clinician_notes: c.clinician_notes,
            avoid: c.avoid,
            red_flags_present: c.red_flags_present.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScoreRes {
    pub name: String,
    pub percentage: u8,
}

impl From<DiseaseScore> for ScoreRes {
    fn from(s: DiseaseScore) -> Self {
        Self {
            name: s.name,
            percentage: s.percentage,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TriageRes {
    /// Band identifier, for example `prompt_clinic_visit`.
    pub band: String,
    /// Human-readable band label.
    pub label: String,
    pub guard: String,
    pub advice: Vec<String>,
}

impl From<TriageOutcome> for TriageRes {
    fn from(t: TriageOutcome) -> Self {
        let band = serde_json::to_value(t.band)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();
        Self {
            band,
            label: t.band.label().to_string(),
            guard: t.guard.to_string(),
            advice: t.advice,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssessRes {
    pub top_conditions: Vec<ConditionRes>,
    pub scores: Vec<ScoreRes>,
    pub triage: TriageRes,
    pub ignored: Vec<String>,
}

impl From<Assessment> for AssessRes {
    fn from(a: Assessment) -> Self {
        Self {
            top_conditions: a.top_conditions.into_iter().map(Into::into).collect(),
            scores: a.scores.into_iter().map(Into::into).collect(),
            triage: a.triage.into(),
            ignored: a.ignored,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MatchReq {
    pub text: String,
    /// Maximum number of results (default 3).
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TextMatchRes {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MatchRes {
    pub matches: Vec<TextMatchRes>,
}
