// Events module
// Completion events emitted by the audio engine

use tokio::sync::oneshot;

/// Terminal event of one engine run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Output file is fully written and readable
    Finished,
    /// Engine failed; carries its diagnostic text
    Failed(String),
}

/// Receiving side of an engine run. Resolves exactly once.
pub type EngineCompletion = oneshot::Receiver<EngineEvent>;

/// Sending side held by whoever supervises the engine process.
#[derive(Debug)]
pub struct EngineEmitter {
    tx: oneshot::Sender<EngineEvent>,
}

impl EngineEmitter {
    pub fn channel() -> (EngineEmitter, EngineCompletion) {
        let (tx, rx) = oneshot::channel();
        (EngineEmitter { tx }, rx)
    }

    /// Resolves once the listener has gone away without waiting for the event.
    pub async fn closed(&mut self) {
        self.tx.closed().await
    }

    /// Emits the event. A listener that already went away is not an error:
    /// its session has been torn down and nobody is left to notify.
    pub fn emit(self, event: EngineEvent) {
        if self.tx.send(event).is_err() {
            log::debug!("Engine completion dropped: listener is gone");
        }
    }
}
