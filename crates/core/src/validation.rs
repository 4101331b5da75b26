//! Input validation utilities.
//!
//! This module checks a [`SelectionSet`] against the knowledge base vocabulary before it is
//! scored or classified. What happens to tags outside the vocabulary is governed by
//! [`UnknownTagPolicy`].

use crate::config::UnknownTagPolicy;
use crate::constants::MAX_AGE_YEARS;
use crate::selection::SelectionSet;
use crate::{TriageError, TriageResult};
use knowledge::{TagSection, Vocabulary};
use std::collections::{BTreeMap, BTreeSet};
use triage_types::TagId;

/// A selection that passed validation, plus whatever was dropped under the `ignore` policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedSelection {
    pub selection: SelectionSet,
    /// Dropped entries, formatted as `<section>:<tag>`.
    pub ignored: Vec<String>,
}

/// Validates a selection against the vocabulary.
///
/// # Arguments
///
/// * `vocabulary` - The controlled vocabulary of the loaded knowledge base.
/// * `selection` - The caller's selection.
/// * `policy` - What to do with tags outside the vocabulary.
///
/// # Errors
///
/// Returns `TriageError::InvalidInput` if the age is implausible, or if any tag or flag is not in
/// the vocabulary and `policy` is [`UnknownTagPolicy::Reject`].
pub fn validate_selection(
    vocabulary: &Vocabulary,
    selection: &SelectionSet,
    policy: UnknownTagPolicy,
) -> TriageResult<ValidatedSelection> {
    if let Some(age) = selection.age {
        if age > MAX_AGE_YEARS {
            return Err(TriageError::InvalidInput(format!(
                "age {age} exceeds maximum of {MAX_AGE_YEARS}"
            )));
        }
    }

    let mut ignored = Vec::new();

    let symptoms = retain_known(
        vocabulary,
        TagSection::Symptom,
        &selection.symptoms,
        policy,
        &mut ignored,
    )?;
    let exposures = retain_known(
        vocabulary,
        TagSection::Exposure,
        &selection.exposures,
        policy,
        &mut ignored,
    )?;
    let comorbidities = retain_known(
        vocabulary,
        TagSection::Comorbidity,
        &selection.comorbidities,
        policy,
        &mut ignored,
    )?;

    let mut flags = BTreeMap::new();
    for (flag, value) in &selection.flags {
        if vocabulary.contains(TagSection::Flag, flag.as_str()) {
            flags.insert(flag.clone(), *value);
        } else {
            reject_or_record(TagSection::Flag, flag, policy, &mut ignored)?;
        }
    }

    if !ignored.is_empty() {
        tracing::warn!(ignored = ?ignored, "ignoring tags outside the vocabulary");
    }

    Ok(ValidatedSelection {
        selection: SelectionSet {
            symptoms,
            exposures,
            flags,
            age: selection.age,
            days_sick: selection.days_sick,
            comorbidities,
        },
        ignored,
    })
}

fn retain_known(
    vocabulary: &Vocabulary,
    section: TagSection,
    tags: &BTreeSet<TagId>,
    policy: UnknownTagPolicy,
    ignored: &mut Vec<String>,
) -> TriageResult<BTreeSet<TagId>> {
    let mut known = BTreeSet::new();
    for tag in tags {
        if vocabulary.contains(section, tag.as_str()) {
            known.insert(tag.clone());
        } else {
            reject_or_record(section, tag, policy, ignored)?;
        }
    }
    Ok(known)
}

fn reject_or_record(
    section: TagSection,
    tag: &TagId,
    policy: UnknownTagPolicy,
    ignored: &mut Vec<String>,
) -> TriageResult<()> {
    match policy {
        UnknownTagPolicy::Reject => Err(TriageError::InvalidInput(format!(
            "unknown {section} tag '{tag}'"
        ))),
        UnknownTagPolicy::Ignore => {
            ignored.push(format!("{section}:{tag}"));
            Ok(())
        }
    }
}
