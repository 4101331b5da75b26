//! Controlled tag vocabulary.
//!
//! Every tag a disease record or a user selection may reference is declared here, together with
//! a human-readable label. Keeping a single vocabulary across all records is what makes overlap
//! scores comparable between diseases.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use triage_types::{NonEmptyText, TagId};

/// The vocabulary section a tag belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagSection {
    Symptom,
    Exposure,
    RedFlag,
    Flag,
    Comorbidity,
}

impl fmt::Display for TagSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagSection::Symptom => "symptom",
            TagSection::Exposure => "exposure",
            TagSection::RedFlag => "red-flag",
            TagSection::Flag => "flag",
            TagSection::Comorbidity => "comorbidity",
        };
        f.write_str(name)
    }
}

/// Tag identifiers and their display labels, grouped by section.
///
/// Sections are keyed in identifier order so iteration is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    pub symptoms: BTreeMap<TagId, NonEmptyText>,
    pub exposures: BTreeMap<TagId, NonEmptyText>,
    pub flags: BTreeMap<TagId, NonEmptyText>,
    pub comorbidities: BTreeMap<TagId, NonEmptyText>,
}

impl Vocabulary {
    /// Returns true when `tag` is declared in `section`.
    ///
    /// Red flags are drawn from the symptom vocabulary.
    pub fn contains(&self, section: TagSection, tag: &str) -> bool {
        self.section(section).contains_key(tag)
    }

    /// Returns the display label for a tag, if it is declared in `section`.
    pub fn label(&self, section: TagSection, tag: &str) -> Option<&str> {
        self.section(section).get(tag).map(NonEmptyText::as_str)
    }

    fn section(&self, section: TagSection) -> &BTreeMap<TagId, NonEmptyText> {
        match section {
            TagSection::Symptom | TagSection::RedFlag => &self.symptoms,
            TagSection::Exposure => &self.exposures,
            TagSection::Flag => &self.flags,
            TagSection::Comorbidity => &self.comorbidities,
        }
    }
}
