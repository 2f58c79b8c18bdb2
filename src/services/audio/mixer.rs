use std::sync::Arc;

use log::info;

use super::engine::{AudioEngine, EngineJob};
use super::filter_graph::FilterGraphSpec;
use crate::errors::{PipelineError, PipelineResult};
use crate::events::EngineEvent;
use crate::utils::temp::Session;

/// Смешивание голоса с фоновой дорожкой.
///
/// Expects the background track to be fully written to the session's
/// background slot before [`Mixer::mix`] is called.
pub struct Mixer {
    engine: Arc<dyn AudioEngine>,
    spec: FilterGraphSpec,
}

impl Mixer {
    pub fn new(engine: Arc<dyn AudioEngine>) -> Self {
        Self {
            engine,
            spec: FilterGraphSpec::default(),
        }
    }

    /// Writes `voice` to the session's voice slot, runs the engine and returns
    /// the bytes of the mixed output. Suspends only the calling session while
    /// the engine runs.
    pub async fn mix(&self, voice: &[u8], session: &Session) -> PipelineResult<Vec<u8>> {
        tokio::fs::write(session.voice_path(), voice)
            .await
            .map_err(|e| PipelineError::Mix(format!("Failed to persist voice track: {}", e)))?;

        let job = EngineJob::stereo_mp3(
            vec![
                session.background_path().to_path_buf(),
                session.voice_path().to_path_buf(),
            ],
            self.spec.to_expression(),
            session.output_path().to_path_buf(),
        );

        info!("Mixing audio files for session {}", session.id());
        let completion = self.engine.start(job).await?;

        match completion.await {
            Ok(EngineEvent::Finished) => {}
            Ok(EngineEvent::Failed(diagnostic)) => return Err(PipelineError::Mix(diagnostic)),
            Err(_) => {
                return Err(PipelineError::Mix(
                    "Audio engine stopped without reporting completion".to_string(),
                ));
            }
        }

        tokio::fs::read(session.output_path())
            .await
            .map_err(|e| PipelineError::Mix(format!("Failed to read mixed output: {}", e)))
    }
}
