use std::path::Path;

use bytes::Bytes;
use uuid::Uuid;

pub const AUDIO_MPEG: &str = "audio/mpeg";

/// An audio object ready for upload. Consumed by value when published.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl Artifact {
    /// Mixed output of one pipeline run: `mix_<uuid>.mp3`, `audio/mpeg`.
    pub fn mix(bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: format!("mix_{}.mp3", Uuid::new_v4()),
            content_type: AUDIO_MPEG.to_string(),
            bytes: bytes.into(),
        }
    }

    /// User-supplied track. Keeps the original extension (`.mp3` if none)
    /// under a fresh uuid name.
    pub fn upload(
        original_name: Option<&str>,
        content_type: Option<&str>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        let extension = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .unwrap_or("mp3");

        Self {
            filename: format!("{}.{}", Uuid::new_v4(), extension),
            content_type: content_type.unwrap_or(AUDIO_MPEG).to_string(),
            bytes: bytes.into(),
        }
    }
}
