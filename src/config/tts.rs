use serde::{Deserialize, Serialize};

/// Default ElevenLabs voice (Bella)
pub const DEFAULT_VOICE_ID: &str = "EXAVITQu4vr4xnSDxMaL";

pub const MODEL_ID: &str = "eleven_multilingual_v2";

// Lower stability = more expressive delivery
pub const STABILITY: f32 = 0.35;
pub const SIMILARITY_BOOST: f32 = 0.8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: STABILITY,
            similarity_boost: SIMILARITY_BOOST,
        }
    }
}
