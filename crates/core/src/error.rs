#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("knowledge base error: {0}")]
    Knowledge(#[from] knowledge::KnowledgeError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl TriageError {
    /// True for errors caused by the caller's selection rather than by start-up configuration.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, TriageError::InvalidInput(_))
    }
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;
