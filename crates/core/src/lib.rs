//! # Triage Core
//!
//! Decision logic for the symptom triage advisor.
//!
//! This crate contains pure, synchronous evaluation over a read-only knowledge base:
//! - Structured-tag scoring of diseases against a selection
//! - Free-text matching of a typed description against the knowledge base
//! - Priority-ordered classification into an urgency band
//! - Input validation and start-up configuration
//!
//! **No presentation concerns**: rendering, HTTP servers and command-line parsing belong in
//! `api-rest` and `triage-cli`.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod error;
pub mod matcher;
pub mod scoring;
pub mod selection;
pub mod service;
pub mod validation;

pub use classifier::{classify, TriageOutcome, UrgencyBand};
pub use config::{CoreConfig, UnknownTagPolicy};
pub use error::{TriageError, TriageResult};
pub use matcher::{score_by_text, tokenize, TextMatch};
pub use scoring::{compute_scores, raw_score, DiseaseScore, ScoreResult};
pub use selection::SelectionSet;
pub use service::{Assessment, ConditionSummary, TriageService};

pub use knowledge::{DiseaseRecord, KnowledgeBase};
pub use triage_types::TagId;
