// Error handling module
// Contains the error taxonomy of the mixing pipeline and its collaborators

use std::path::PathBuf;

use thiserror::Error;

/// Ошибки конвейера микширования.
///
/// Each variant names the stage that failed. The first failing stage
/// short-circuits the pipeline, so a request never carries more than one.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("Background fetch error: {0}")]
    Fetch(String),

    #[error("Mixing error: {0}")]
    Mix(String),

    #[error("Publish error: {0}")]
    Publish(String),
}

impl PipelineError {
    /// Short stage name used in log lines.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Synthesis(_) => "synthesis",
            PipelineError::Fetch(_) => "fetch",
            PipelineError::Mix(_) => "mix",
            PipelineError::Publish(_) => "publish",
        }
    }

    /// Message returned to the caller. Upstream diagnostics stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Validation(message) => message.clone(),
            PipelineError::Synthesis(_) => "Failed to generate speech".to_string(),
            PipelineError::Fetch(_) => "Failed to download background track".to_string(),
            PipelineError::Mix(_) => "Error mixing audio".to_string(),
            PipelineError::Publish(_) => "Failed to upload mix".to_string(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::Validation(_))
    }
}

/// Failure to remove one temp file. Logged by the janitor, never surfaced.
#[derive(Debug, Error)]
#[error("Failed to remove {}: {source}", path.display())]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("ffmpeg binary not found: {0}")]
    MissingBinary(String),
}

// Result type alias for the pipeline
pub type PipelineResult<T> = Result<T, PipelineError>;
