use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use super::ArtifactPublisher;
use crate::errors::{PipelineError, PipelineResult};
use crate::models::Artifact;

pub const AUDIO_BUCKET: &str = "audio-uploads";

/// Uploads objects into a Supabase Storage bucket
pub struct SupabasePublisher {
    client: Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl SupabasePublisher {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            bucket: AUDIO_BUCKET.to_string(),
        }
    }

    pub fn upload_url(&self, filename: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, filename
        )
    }

    pub fn public_url(&self, filename: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, filename
        )
    }
}

#[async_trait]
impl ArtifactPublisher for SupabasePublisher {
    async fn publish(&self, artifact: Artifact) -> PipelineResult<String> {
        info!(
            "Uploading {} ({} bytes) to storage",
            artifact.filename,
            artifact.bytes.len()
        );

        let response = self
            .client
            .post(self.upload_url(&artifact.filename))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("apikey", &self.api_key)
            .header(CONTENT_TYPE, &artifact.content_type)
            .body(artifact.bytes)
            .send()
            .await
            .map_err(|e| PipelineError::Publish(format!("Storage request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Supabase upload failed: {} {}", status, error_text);
            return Err(PipelineError::Publish(format!(
                "Supabase upload failed: {} {}",
                status, error_text
            )));
        }

        Ok(self.public_url(&artifact.filename))
    }
}
