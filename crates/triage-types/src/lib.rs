//! Validated primitive types shared across the triage workspace.
//!
//! Every crate that touches knowledge-base data or user selections speaks in these types, so
//! the invariants they carry (non-empty names, well-formed tag identifiers) are checked once at
//! the boundary and then relied upon everywhere else.

use std::borrow::Borrow;
use std::fmt;

/// Error returned when building a [`NonEmptyText`].
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// A name, alias or label was blank
    #[error("text cannot be empty")]
    Empty,
}

/// Errors that can occur when creating a [`TagId`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TagError {
    /// The input was empty or contained only whitespace
    #[error("tag cannot be empty")]
    Empty,

    /// The input contained characters outside `a-z`, `0-9` and `_`
    #[error("tag '{0}' contains invalid characters (only lowercase ASCII letters, digits and '_' allowed)")]
    InvalidCharacters(String),
}

/// Disease names, aliases and vocabulary labels.
///
/// Lookup and duplicate detection compare these case-insensitively, so a blank value would
/// collide with every other blank one. Construction trims the input and refuses it if nothing
/// is left.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Trims `input` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] when nothing but whitespace was given, for example a
    /// `name: "  "` entry in the knowledge base.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// An identifier from the controlled tag vocabulary (for example `fever`, `mosquito_bites`).
///
/// Tags are the currency of cross-disease comparison: every symptom, exposure, red flag and
/// comorbidity is referenced by one. The canonical form is lowercase ASCII letters, digits and
/// underscores. Surrounding whitespace is trimmed and ASCII uppercase letters are folded to
/// lowercase during construction, so `" Fever "` and `"fever"` produce the same tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagId(String);

impl TagId {
    /// Parses and normalises a tag identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::Empty`] for blank input and [`TagError::InvalidCharacters`] when the
    /// normalised value contains anything other than `a-z`, `0-9` or `_`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TagError> {
        let normalised = input.as_ref().trim().to_ascii_lowercase();
        if normalised.is_empty() {
            return Err(TagError::Empty);
        }

        let ok = normalised
            .bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_'));
        if !ok {
            return Err(TagError::InvalidCharacters(normalised));
        }

        Ok(Self(normalised))
    }

    /// Returns the canonical identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for TagId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TagId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for TagId {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagId::new(s)
    }
}

impl serde::Serialize for TagId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for TagId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TagId::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Influenza  ").expect("should accept");
        assert_eq!(text.as_str(), "Influenza");
    }

    #[test]
    fn non_empty_text_honours_width_when_displayed() {
        let name = NonEmptyText::new("Dengue").expect("should accept");
        assert_eq!(format!("[{name:<8}]"), "[Dengue  ]");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
    }

    #[test]
    fn tag_is_normalised_to_lowercase() {
        let tag = TagId::new(" Shortness_Breath ").expect("should accept");
        assert_eq!(tag.as_str(), "shortness_breath");
    }

    #[test]
    fn tag_rejects_empty_input() {
        assert_eq!(TagId::new(""), Err(TagError::Empty));
        assert_eq!(TagId::new("  "), Err(TagError::Empty));
    }

    #[test]
    fn tag_rejects_spaces_and_punctuation() {
        assert!(matches!(
            TagId::new("sore throat"),
            Err(TagError::InvalidCharacters(_))
        ));
        assert!(matches!(
            TagId::new("sars-cov-2"),
            Err(TagError::InvalidCharacters(_))
        ));
    }

    #[test]
    fn tag_deserialisation_validates() {
        let tag: TagId = serde_json::from_str("\"Fever\"").expect("valid tag");
        assert_eq!(tag.as_str(), "fever");

        let err = serde_json::from_str::<TagId>("\"no good\"").expect_err("invalid tag");
        assert!(err.to_string().contains("invalid characters"));
    }

    #[test]
    fn tag_borrows_as_str_for_set_lookups() {
        let set: std::collections::BTreeSet<TagId> =
            [TagId::new("fever").expect("valid")].into_iter().collect();
        assert!(set.contains("fever"));
        assert!(!set.contains("cough"));
    }
}
