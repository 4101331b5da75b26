//! Constants used throughout the triage core crate.
//!
//! Tag identifiers referenced directly by the classifier live here so they can be checked
//! against the knowledge base vocabulary at start-up.

/// Symptom tags whose presence alone selects the Emergency band.
pub const RED_FLAG_SYMPTOMS: [&str; 7] = [
    "shortness_breath",
    "confusion",
    "chest_pain",
    "bleeding",
    "mucosal_bleed",
    "severe_abdominal_pain",
    "persistent_vomiting",
];

pub const FEVER: &str = "fever";
pub const COUGH: &str = "cough";
pub const SHORTNESS_BREATH: &str = "shortness_breath";

/// Flag name for severe dehydration.
pub const SEVERE_DEHYDRATION: &str = "severe_dehydration";

/// Flag name for moderate dehydration.
pub const MODERATE_DEHYDRATION: &str = "moderate_dehydration";

/// Days of fever after which an in-person evaluation within 24 hours is advised.
pub const URGENT_FEVER_DAYS: u32 = 3;

/// Days unwell after which moderate dehydration is treated as urgent.
pub const URGENT_DEHYDRATION_DAYS: u32 = 1;

/// Comorbidity count from which fever or cough warrants a clinic visit within 48 hours.
pub const PROMPT_VISIT_COMORBIDITIES: u32 = 2;

/// Default number of top-matching conditions returned by an assessment.
pub const DEFAULT_TOP_N: usize = 3;

/// Largest age accepted by input validation.
pub const MAX_AGE_YEARS: u32 = 130;

/// Environment variable naming a knowledge base YAML file that replaces the built-in one.
pub const ENV_KB_PATH: &str = "TRIAGE_KB_PATH";

/// Environment variable holding the number of top conditions to return.
pub const ENV_TOP_N: &str = "TRIAGE_TOP_N";

/// Environment variable selecting the unknown-tag policy (`reject` or `ignore`).
pub const ENV_UNKNOWN_TAGS: &str = "TRIAGE_UNKNOWN_TAGS";

/// Environment variable holding the REST listen address.
pub const ENV_REST_ADDR: &str = "TRIAGE_REST_ADDR";

/// REST listen address used when [`ENV_REST_ADDR`] is unset.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";
