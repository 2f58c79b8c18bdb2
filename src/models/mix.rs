use serde::{Deserialize, Serialize};

use crate::config::tts::DEFAULT_VOICE_ID;
use crate::errors::PipelineError;

/// Wire shape of `POST /api/mix-audio`. Fields are optional here so that a
/// missing field is reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixAudioRequest {
    pub text: Option<String>,
    pub voice: Option<String>,
    pub bg_url: Option<String>,
}

/// Validated, immutable input of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixRequest {
    pub text: String,
    pub voice_id: String,
    pub background_url: String,
}

impl TryFrom<MixAudioRequest> for MixRequest {
    type Error = PipelineError;

    fn try_from(request: MixAudioRequest) -> Result<Self, Self::Error> {
        let text = non_blank(request.text);
        let background_url = non_blank(request.bg_url);

        match (text, background_url) {
            (Some(text), Some(background_url)) => Ok(Self {
                text,
                voice_id: non_blank(request.voice).unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
                background_url,
            }),
            _ => Err(PipelineError::Validation(
                "Text and bgUrl are required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixAudioResponse {
    pub mix_url: String,
}

/// Body of `POST /api/speech` and query of `GET /api/speech`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: Option<String>,
    pub voice: Option<String>,
}

impl SpeechRequest {
    /// Returns `(text, voice_id)` with the default voice filled in.
    pub fn validate(self) -> Result<(String, String), PipelineError> {
        let text = non_blank(self.text)
            .ok_or_else(|| PipelineError::Validation("Text is required".to_string()))?;
        let voice = non_blank(self.voice).unwrap_or_else(|| DEFAULT_VOICE_ID.to_string());
        Ok((text, voice))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
