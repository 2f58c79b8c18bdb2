// Services module
// Pipeline stages and the coordinator that drives them

pub mod audio;
pub mod download;
pub mod janitor;
pub mod pipeline;
pub mod storage;
pub mod tts;

pub use download::{HttpTrackFetcher, TrackFetcher};
pub use janitor::{CleanupReport, ResourceJanitor, SessionGuard};
pub use pipeline::{MixOutcome, MixPipeline, SessionState};
pub use storage::{ArtifactPublisher, SupabasePublisher};
pub use tts::{ElevenLabsSynthesizer, VoiceSynthesizer};
