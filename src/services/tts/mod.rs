pub mod elevenlabs;

pub use elevenlabs::ElevenLabsSynthesizer;

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::PipelineResult;

/// Text-to-speech boundary. Returns raw `audio/mpeg` bytes.
#[async_trait]
pub trait VoiceSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice_id: &str) -> PipelineResult<Bytes>;
}
