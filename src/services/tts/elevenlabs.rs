use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, error, info};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Serialize;

use super::VoiceSynthesizer;
use crate::config::tts::{MODEL_ID, VoiceSettings};
use crate::errors::{PipelineError, PipelineResult};
use crate::models::AUDIO_MPEG;

#[derive(Debug, Serialize)]
struct SynthesisPayload<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// Клиент для работы с ElevenLabs TTS API
pub struct ElevenLabsSynthesizer {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ElevenLabsSynthesizer {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.base_url.trim_end_matches('/'),
            voice_id
        )
    }
}

#[async_trait]
impl VoiceSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str, voice_id: &str) -> PipelineResult<Bytes> {
        info!("Generating speech with voice {}", voice_id);

        let payload = SynthesisPayload {
            text,
            model_id: MODEL_ID,
            voice_settings: VoiceSettings::default(),
        };

        let response = self
            .client
            .post(self.endpoint(voice_id))
            .header(ACCEPT, AUDIO_MPEG)
            .header("xi-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PipelineError::Synthesis(format!("TTS request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("TTS API request failed (status {}): {}", status, error_text);
            return Err(PipelineError::Synthesis(format!(
                "TTS API returned {}: {}",
                status, error_text
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PipelineError::Synthesis(format!("Failed to read TTS audio: {}", e)))?;

        debug!("Received {} bytes of synthesized speech", bytes.len());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let tts = ElevenLabsSynthesizer::new(Client::new(), "https://api.elevenlabs.io/", "key");
        assert_eq!(
            tts.endpoint("EXAVITQu4vr4xnSDxMaL"),
            "https://api.elevenlabs.io/v1/text-to-speech/EXAVITQu4vr4xnSDxMaL"
        );
    }

    #[test]
    fn payload_shape() {
        let payload = SynthesisPayload {
            text: "Happy birthday!",
            model_id: MODEL_ID,
            voice_settings: VoiceSettings::default(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["text"], "Happy birthday!");
        assert_eq!(value["model_id"], "eleven_multilingual_v2");
        let stability = value["voice_settings"]["stability"].as_f64().unwrap();
        let similarity = value["voice_settings"]["similarity_boost"].as_f64().unwrap();
        assert!((stability - 0.35).abs() < 1e-6);
        assert!((similarity - 0.8).abs() < 1e-6);
    }
}
