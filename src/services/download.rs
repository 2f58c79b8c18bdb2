//! Streaming download of the background track

use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, info};
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::errors::{PipelineError, PipelineResult};

#[async_trait]
pub trait TrackFetcher: Send + Sync {
    /// Downloads `url` into `destination`. Resolves only after the file is
    /// flushed to disk; returns the number of bytes written.
    async fn fetch(&self, url: &str, destination: &Path) -> PipelineResult<u64>;
}

pub struct HttpTrackFetcher {
    client: Client,
}

impl HttpTrackFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TrackFetcher for HttpTrackFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> PipelineResult<u64> {
        info!("Downloading background track to {}", destination.display());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::Fetch(format!("Background request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Fetch(format!(
                "Background source returned {}",
                status
            )));
        }

        let write_error = |e: std::io::Error| {
            PipelineError::Fetch(format!("Failed to write {}: {}", destination.display(), e))
        };

        let mut file = File::create(destination).await.map_err(write_error)?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                PipelineError::Fetch(format!("Background download interrupted: {}", e))
            })?;
            file.write_all(&chunk).await.map_err(write_error)?;
            written += chunk.len() as u64;
        }

        // Data must be on disk before ffmpeg opens the file
        file.flush().await.map_err(write_error)?;
        file.sync_all().await.map_err(write_error)?;

        debug!("Background track written: {} bytes", written);
        Ok(written)
    }
}
