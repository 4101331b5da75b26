//! Per-request user selections.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use triage_types::TagId;

/// Everything the user entered for one evaluation.
///
/// A `SelectionSet` is built fresh for each request and discarded afterwards. Numeric fields are
/// unsigned, so negative values are rejected wherever the set is parsed (command-line arguments,
/// JSON bodies) before it ever reaches the core.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionSet {
    #[serde(default)]
    pub symptoms: BTreeSet<TagId>,
    #[serde(default)]
    pub exposures: BTreeSet<TagId>,
    /// Named severity flags such as `severe_dehydration`. Absent means false.
    #[serde(default)]
    pub flags: BTreeMap<TagId, bool>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub days_sick: u32,
    /// Selected entries from the fixed comorbidity list.
    #[serde(default)]
    pub comorbidities: BTreeSet<TagId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symptom(mut self, tag: TagId) -> Self {
        self.symptoms.insert(tag);
        self
    }

    pub fn with_exposure(mut self, tag: TagId) -> Self {
        self.exposures.insert(tag);
        self
    }

    pub fn with_flag(mut self, flag: TagId, value: bool) -> Self {
        self.flags.insert(flag, value);
        self
    }

    pub fn with_comorbidity(mut self, tag: TagId) -> Self {
        self.comorbidities.insert(tag);
        self
    }

    pub fn with_days_sick(mut self, days: u32) -> Self {
        self.days_sick = days;
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Number of selected comorbidities.
    pub fn comorbid_count(&self) -> u32 {
        u32::try_from(self.comorbidities.len()).unwrap_or(u32::MAX)
    }

    /// True when neither symptoms nor exposures were selected.
    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty() && self.exposures.is_empty()
    }
}
