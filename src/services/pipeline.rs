//! Request coordinator for the mix-audio flow
//!
//! One [`MixPipeline::run`] call is one pipeline instance: validate, open a
//! session, then synthesize → fetch → mix → publish. The first failing stage
//! ends the run. The session's temp files are swept exactly once on the way
//! out, whichever branch ended it.

use std::path::PathBuf;
use std::sync::Arc;

use log::{error, info, warn};
use uuid::Uuid;

use super::audio::Mixer;
use super::download::TrackFetcher;
use super::janitor::SessionGuard;
use super::storage::ArtifactPublisher;
use super::tts::VoiceSynthesizer;
use crate::errors::PipelineResult;
use crate::models::{Artifact, MixAudioRequest, MixRequest};
use crate::utils::temp::Session;

/// Lifecycle of one session. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Synthesizing,
    Fetching,
    Mixing,
    Publishing,
    Done,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Done | SessionState::Failed)
    }

    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        match (self, next) {
            (current, Failed) => !current.is_terminal(),
            (Idle, Synthesizing)
            | (Synthesizing, Fetching)
            | (Fetching, Mixing)
            | (Mixing, Publishing)
            | (Publishing, Done) => true,
            _ => false,
        }
    }
}

/// Tracks and logs the state of one session.
#[derive(Debug)]
struct StageTracker {
    session_id: Uuid,
    state: SessionState,
}

impl StageTracker {
    fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            state: SessionState::Idle,
        }
    }

    fn enter(&mut self, next: SessionState) {
        if !self.state.can_transition_to(next) {
            error!(
                "Session {}: illegal transition {:?} -> {:?}",
                self.session_id, self.state, next
            );
            return;
        }
        info!("Session {}: {:?} -> {:?}", self.session_id, self.state, next);
        self.state = next;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixOutcome {
    pub session_id: Uuid,
    pub mix_url: String,
}

pub struct MixPipeline {
    synthesizer: Arc<dyn VoiceSynthesizer>,
    fetcher: Arc<dyn TrackFetcher>,
    mixer: Mixer,
    publisher: Arc<dyn ArtifactPublisher>,
    work_dir: PathBuf,
}

impl MixPipeline {
    pub fn new(
        synthesizer: Arc<dyn VoiceSynthesizer>,
        fetcher: Arc<dyn TrackFetcher>,
        mixer: Mixer,
        publisher: Arc<dyn ArtifactPublisher>,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            synthesizer,
            fetcher,
            mixer,
            publisher,
            work_dir,
        }
    }

    /// Runs one request to completion. Returns exactly one outcome.
    pub async fn run(&self, request: MixAudioRequest) -> PipelineResult<MixOutcome> {
        // No session exists yet, so a validation failure leaves nothing behind
        let request = MixRequest::try_from(request)?;

        let guard = SessionGuard::new(Session::new(&self.work_dir));
        let session_id = guard.session().id();
        info!(
            "Starting mix {} for voice {} and bgUrl: {}...",
            session_id,
            request.voice_id,
            truncate(&request.background_url, 50)
        );

        let mut tracker = StageTracker::new(session_id);
        let result = self.drive(&request, guard.session(), &mut tracker).await;

        match &result {
            Ok(_) => tracker.enter(SessionState::Done),
            Err(e) => {
                warn!("Session {}: {} stage failed: {}", session_id, e.stage(), e);
                tracker.enter(SessionState::Failed);
            }
        }
        guard.release();

        result.map(|mix_url| MixOutcome {
            session_id,
            mix_url,
        })
    }

    async fn drive(
        &self,
        request: &MixRequest,
        session: &Session,
        tracker: &mut StageTracker,
    ) -> PipelineResult<String> {
        tracker.enter(SessionState::Synthesizing);
        let voice = self
            .synthesizer
            .synthesize(&request.text, &request.voice_id)
            .await?;

        tracker.enter(SessionState::Fetching);
        self.fetcher
            .fetch(&request.background_url, session.background_path())
            .await?;

        tracker.enter(SessionState::Mixing);
        let mixed = self.mixer.mix(&voice, session).await?;

        tracker.enter(SessionState::Publishing);
        self.publisher.publish(Artifact::mix(mixed)).await
    }
}

fn truncate(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionState::*;

    #[test]
    fn happy_path_transitions_are_linear() {
        let path = [Idle, Synthesizing, Fetching, Mixing, Publishing, Done];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?}", pair);
        }
    }

    #[test]
    fn any_active_state_can_fail() {
        for state in [Idle, Synthesizing, Fetching, Mixing, Publishing] {
            assert!(state.can_transition_to(Failed));
        }
    }

    #[test]
    fn terminal_states_are_final() {
        for terminal in [Done, Failed] {
            assert!(terminal.is_terminal());
            for next in [Idle, Synthesizing, Fetching, Mixing, Publishing, Done, Failed] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn no_state_is_revisited_or_skipped() {
        assert!(!Fetching.can_transition_to(Synthesizing));
        assert!(!Synthesizing.can_transition_to(Mixing));
        assert!(!Mixing.can_transition_to(Mixing));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("https://example.com", 8), "https://");
        assert_eq!(truncate("short", 50), "short");
        assert_eq!(truncate("пример", 3), "при");
    }
}
