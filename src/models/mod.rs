// Domain models module
// Contains core data structures used throughout the application

pub mod artifact;
pub mod mix;

pub use artifact::{Artifact, AUDIO_MPEG};
pub use mix::{MixAudioRequest, MixAudioResponse, MixRequest, SpeechRequest, UploadResponse};

use serde::Serialize;

/// JSON body of every failed request
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
