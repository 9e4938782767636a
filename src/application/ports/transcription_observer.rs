use crate::domain::TranscriptionState;

/// Receives progress of a transcription request, typically to drive a UI.
pub trait TranscriptionObserver: Send + Sync {
    fn on_transition(&self, state: &TranscriptionState);

    /// Called with `true` when a request starts and `false` once it has ended, however it ended.
    fn set_busy(&self, busy: bool);
}
