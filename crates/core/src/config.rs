//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Library code never reads environment variables; binaries read them
//! and hand the raw values to the `*_from_env_value` helpers below.

use crate::constants::DEFAULT_TOP_N;
use crate::{TriageError, TriageResult};
use knowledge::KnowledgeBase;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How selected tags that are not in the vocabulary are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTagPolicy {
    /// Fail the request with `InvalidInput`.
    #[default]
    Reject,
    /// Drop the tag, log a warning and carry on.
    Ignore,
}

impl FromStr for UnknownTagPolicy {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(UnknownTagPolicy::Reject),
            "ignore" => Ok(UnknownTagPolicy::Ignore),
            other => Err(TriageError::Configuration(format!(
                "unknown tag policy must be 'reject' or 'ignore', got '{other}'"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    knowledge_base_path: Option<PathBuf>,
    top_n: usize,
    unknown_tag_policy: UnknownTagPolicy,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Configuration` if `top_n` is zero.
    pub fn new(
        knowledge_base_path: Option<PathBuf>,
        top_n: usize,
        unknown_tag_policy: UnknownTagPolicy,
    ) -> TriageResult<Self> {
        if top_n == 0 {
            return Err(TriageError::Configuration(
                "top_n must be at least 1".into(),
            ));
        }

        Ok(Self {
            knowledge_base_path,
            top_n,
            unknown_tag_policy,
        })
    }

    /// Optional file replacing the built-in knowledge base.
    pub fn knowledge_base_path(&self) -> Option<&Path> {
        self.knowledge_base_path.as_deref()
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn unknown_tag_policy(&self) -> UnknownTagPolicy {
        self.unknown_tag_policy
    }

    /// Load the configured knowledge base, falling back to the built-in one.
    pub fn load_knowledge_base(&self) -> TriageResult<KnowledgeBase> {
        let kb = match &self.knowledge_base_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading knowledge base override");
                KnowledgeBase::from_path(path)?
            }
            None => KnowledgeBase::builtin()?,
        };
        Ok(kb)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            knowledge_base_path: None,
            top_n: DEFAULT_TOP_N,
            unknown_tag_policy: UnknownTagPolicy::default(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the knowledge base override path from an optional string value.
///
/// If `value` is `None` or empty/whitespace, the built-in knowledge base is used.
pub fn knowledge_base_path_from_env_value(value: Option<String>) -> Option<PathBuf> {
    non_blank(value).map(PathBuf::from)
}

/// Parse the number of top conditions from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_TOP_N`].
pub fn top_n_from_env_value(value: Option<String>) -> TriageResult<usize> {
    let Some(value) = non_blank(value) else {
        return Ok(DEFAULT_TOP_N);
    };

    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(TriageError::Configuration(format!(
            "top_n must be a positive integer, got '{value}'"
        ))),
    }
}

/// Parse the unknown-tag policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`UnknownTagPolicy::Reject`].
pub fn unknown_tag_policy_from_env_value(value: Option<String>) -> TriageResult<UnknownTagPolicy> {
    let parsed = non_blank(value)
        .map(|v| v.parse::<UnknownTagPolicy>())
        .transpose()?;

    Ok(parsed.unwrap_or_default())
}
