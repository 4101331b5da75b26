//! Free-text matching.
//!
//! Used when the caller has a typed description instead of discrete tag selections. Matching is
//! intentionally loose: a token matches a phrase when either is a substring of the other, so
//! partial words like "feve" still hit "fever". Very short tokens therefore match broadly; that
//! behaviour is kept as is.

use knowledge::{DiseaseRecord, KnowledgeBase, TagSection};
use serde::Serialize;

/// Points for each symptom phrase or alias hit by some token.
pub const PHRASE_POINTS: u32 = 2;

/// Extra points when the canonical disease name appears in the text.
pub const NAME_POINTS: u32 = 3;

/// One disease matched against free text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextMatch<'a> {
    pub disease: &'a DiseaseRecord,
    pub score: u32,
}

/// Split text into lowercase alphabetic tokens.
///
/// Tokens are maximal runs of ASCII letters; digits, punctuation and whitespace all separate.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Rank diseases against a free-text description.
///
/// Results are ordered by score (descending) then canonical name (ascending). For non-blank
/// text, diseases scoring 0 are dropped; blank text returns every disease. At most `top_k`
/// entries are returned.
pub fn score_by_text<'a>(kb: &'a KnowledgeBase, text: &str, top_k: usize) -> Vec<TextMatch<'a>> {
    let tokens = tokenize(text);
    let lowered = text.to_lowercase();

    let mut matches: Vec<TextMatch<'a>> = kb
        .records()
        .iter()
        .map(|disease| TextMatch {
            disease,
            score: text_score(kb, disease, &tokens, &lowered),
        })
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.disease.name().cmp(b.disease.name()))
    });

    if !text.trim().is_empty() {
        matches.retain(|m| m.score > 0);
    }
    matches.truncate(top_k);

    tracing::debug!(
        tokens = tokens.len(),
        returned = matches.len(),
        "matched free text"
    );

    matches
}

fn text_score(kb: &KnowledgeBase, disease: &DiseaseRecord, tokens: &[String], lowered: &str) -> u32 {
    let vocabulary = kb.vocabulary();

    let symptom_phrases: Vec<String> = if disease.phrases.is_empty() {
        disease
            .symptoms
            .iter()
            .map(|tag| {
                vocabulary
                    .label(TagSection::Symptom, tag.as_str())
                    .unwrap_or(tag.as_str())
                    .to_lowercase()
            })
            .collect()
    } else {
        disease.phrases.iter().map(|p| p.to_lowercase()).collect()
    };
    let alias_phrases = disease.aliases.iter().map(|alias| alias.as_str().to_lowercase());

    let mut score = symptom_phrases
        .into_iter()
        .chain(alias_phrases)
        .filter(|phrase| {
            tokens
                .iter()
                .any(|token| phrase.contains(token.as_str()) || token.contains(phrase.as_str()))
        })
        .map(|_| PHRASE_POINTS)
        .sum::<u32>();

    if lowered.contains(&disease.name().to_lowercase()) {
        score += NAME_POINTS;
    }

    score
}
