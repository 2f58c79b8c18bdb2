#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use tempfile::TempDir;
use tokio::net::TcpListener;

use cardmix::AppState;
use cardmix::errors::{PipelineError, PipelineResult};
use cardmix::events::{EngineCompletion, EngineEmitter, EngineEvent};
use cardmix::models::Artifact;
use cardmix::services::audio::{AudioEngine, EngineJob, Mixer};
use cardmix::services::{ArtifactPublisher, MixPipeline, TrackFetcher, VoiceSynthesizer};

pub const STORE_BASE: &str = "https://store.test";

pub const EXPECTED_GRAPH: &str = "[0:a]volume=0.2[bg]; [1:a]volume=1.5,adelay=1000|1000,apad=pad_dur=6[v]; [bg][v]amix=inputs=2:duration=shortest:dropout_transition=2[mixed]; [mixed]volume=2.0";

/// Echoes the text back as "audio"
pub struct FakeSynthesizer {
    pub calls: AtomicUsize,
    pub fail: bool,
}

#[async_trait]
impl VoiceSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, text: &str, _voice_id: &str) -> PipelineResult<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PipelineError::Synthesis("TTS API returned 401".into()));
        }
        Ok(Bytes::copy_from_slice(text.as_bytes()))
    }
}

/// Writes the URL itself as the background track. On failure it leaves a
/// partial file behind, like an interrupted download would.
pub struct FakeFetcher {
    pub calls: AtomicUsize,
    pub fail: bool,
}

#[async_trait]
impl TrackFetcher for FakeFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> PipelineResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            tokio::fs::write(destination, b"partial").await.unwrap();
            return Err(PipelineError::Fetch("Background download interrupted".into()));
        }
        tokio::fs::write(destination, url.as_bytes()).await.unwrap();
        Ok(url.len() as u64)
    }
}

/// Produces `<background>|<voice>` as the mix, or fails with a diagnostic.
pub struct FakeEngine {
    pub jobs: Mutex<Vec<EngineJob>>,
    pub fail: bool,
}

#[async_trait]
impl AudioEngine for FakeEngine {
    async fn start(&self, job: EngineJob) -> PipelineResult<EngineCompletion> {
        let (emitter, completion) = EngineEmitter::channel();
        let background = std::fs::read(&job.inputs[0]).unwrap();
        let voice = std::fs::read(&job.inputs[1]).unwrap();
        let fail = self.fail;
        let output = job.output.clone();
        self.jobs.lock().unwrap().push(job);

        tokio::spawn(async move {
            if fail {
                emitter.emit(EngineEvent::Failed(
                    "Invalid data found when processing input".into(),
                ));
                return;
            }
            let mut mixed = background;
            mixed.push(b'|');
            mixed.extend_from_slice(&voice);
            tokio::fs::write(&output, mixed).await.unwrap();
            emitter.emit(EngineEvent::Finished);
        });
        Ok(completion)
    }
}

pub struct FakePublisher {
    pub artifacts: Mutex<Vec<Artifact>>,
    pub fail: bool,
}

#[async_trait]
impl ArtifactPublisher for FakePublisher {
    async fn publish(&self, artifact: Artifact) -> PipelineResult<String> {
        if self.fail {
            return Err(PipelineError::Publish("Supabase upload failed: 403".into()));
        }
        let url = format!(
            "{}/storage/v1/object/public/audio-uploads/{}",
            STORE_BASE, artifact.filename
        );
        self.artifacts.lock().unwrap().push(artifact);
        Ok(url)
    }
}

#[derive(Default, Clone, Copy)]
pub struct Failures {
    pub synthesis: bool,
    pub fetch: bool,
    pub mix: bool,
    pub publish: bool,
}

pub struct Harness {
    pub synthesizer: Arc<FakeSynthesizer>,
    pub fetcher: Arc<FakeFetcher>,
    pub engine: Arc<FakeEngine>,
    pub publisher: Arc<FakePublisher>,
    pub work_dir: TempDir,
}

impl Harness {
    pub fn new(failures: Failures) -> Self {
        Self {
            synthesizer: Arc::new(FakeSynthesizer {
                calls: AtomicUsize::new(0),
                fail: failures.synthesis,
            }),
            fetcher: Arc::new(FakeFetcher {
                calls: AtomicUsize::new(0),
                fail: failures.fetch,
            }),
            engine: Arc::new(FakeEngine {
                jobs: Mutex::new(Vec::new()),
                fail: failures.mix,
            }),
            publisher: Arc::new(FakePublisher {
                artifacts: Mutex::new(Vec::new()),
                fail: failures.publish,
            }),
            work_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn healthy() -> Self {
        Self::new(Failures::default())
    }

    pub fn pipeline(&self) -> MixPipeline {
        self.pipeline_with_engine(self.engine.clone())
    }

    /// Same collaborators, but mixing through `engine`.
    pub fn pipeline_with_engine(&self, engine: Arc<dyn AudioEngine>) -> MixPipeline {
        MixPipeline::new(
            self.synthesizer.clone(),
            self.fetcher.clone(),
            Mixer::new(engine),
            self.publisher.clone(),
            self.work_dir.path().to_path_buf(),
        )
    }

    pub fn app_state(&self, max_upload_bytes: usize) -> AppState {
        AppState {
            pipeline: Arc::new(self.pipeline()),
            synthesizer: self.synthesizer.clone(),
            publisher: self.publisher.clone(),
            max_upload_bytes,
        }
    }

    pub fn synth_calls(&self) -> usize {
        self.synthesizer.calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetcher.calls.load(Ordering::SeqCst)
    }

    pub fn engine_calls(&self) -> usize {
        self.engine.jobs.lock().unwrap().len()
    }

    pub fn published(&self) -> usize {
        self.publisher.artifacts.lock().unwrap().len()
    }

    /// Files left in the work directory
    pub fn leftovers(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.work_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
