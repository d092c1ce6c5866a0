//! Error types for the vctcal ecosystem.

use thiserror::Error;

/// Errors that can occur in vctcal operations.
#[derive(Error, Debug)]
pub enum VctError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown stage '{token}' (known: {known})")]
    UnknownStage { token: String, known: String },

    #[error("Failed to retrieve matches for {stage}: {message}")]
    Retrieval { stage: String, message: String },

    #[error("Identity conflict on {id}: {detail}")]
    IdentityConflict { id: String, detail: String },

    #[error("Calendar document could not be decoded: {0}")]
    CorruptDocument(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VctError {
    pub fn retrieval(stage: impl ToString, message: impl ToString) -> Self {
        VctError::Retrieval {
            stage: stage.to_string(),
            message: message.to_string(),
        }
    }

    /// Errors that mean the shared document can no longer be trusted.
    /// These abort a run instead of being collected per stage.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            VctError::IdentityConflict { .. } | VctError::CorruptDocument(_)
        )
    }
}

/// Result type alias for vctcal operations.
pub type VctResult<T> = Result<T, VctError>;
