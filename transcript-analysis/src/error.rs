use error_common::{codes, RustCareError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Input too large: transcript has {length} characters, limit is {limit}")]
    InputTooLarge { length: usize, limit: usize },

    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("Invalid lexicon: {0}")]
    InvalidLexicon(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Stable error code reported alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::InvalidInput(_) => codes::validation::INVALID_INPUT,
            AnalysisError::InputTooLarge { .. } => codes::validation::INPUT_TOO_LARGE,
            AnalysisError::Serialization(_) => codes::validation::INVALID_FORMAT,
            AnalysisError::CollaboratorUnavailable(_) => codes::analysis::COLLABORATOR_UNAVAILABLE,
            AnalysisError::InvalidLexicon(_) => codes::analysis::INVALID_LEXICON,
            AnalysisError::Config(_) => codes::configuration::INVALID_CONFIG,
            AnalysisError::Io(_) => codes::configuration::SOURCE_UNREADABLE,
        }
    }
}

impl From<AnalysisError> for RustCareError {
    fn from(err: AnalysisError) -> Self {
        let message = format!("[{}] {}", err.code(), err);
        match err {
            AnalysisError::InvalidInput(_)
            | AnalysisError::InputTooLarge { .. }
            | AnalysisError::Serialization(_) => {
                RustCareError::ValidationError(message)
            }
            AnalysisError::CollaboratorUnavailable(_) => RustCareError::ExternalError(message),
            AnalysisError::InvalidLexicon(_) | AnalysisError::Config(_) | AnalysisError::Io(_) => {
                RustCareError::ConfigError(message)
            }
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
