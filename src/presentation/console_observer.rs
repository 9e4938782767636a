use std::sync::atomic::{AtomicBool, Ordering};

use crate::application::ports::TranscriptionObserver;
use crate::domain::TranscriptionState;

/// Reports transcription progress on stderr for the command-line client.
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    busy: AtomicBool,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

impl TranscriptionObserver for ConsoleObserver {
    fn on_transition(&self, state: &TranscriptionState) {
        let line = match state {
            TranscriptionState::Selected => "Preparing to upload...".to_string(),
            TranscriptionState::Converting => "Converting before upload...".to_string(),
            TranscriptionState::ConversionSucceeded => {
                "Conversion successful. Uploading...".to_string()
            }
            TranscriptionState::Uploading => "Uploading for transcription...".to_string(),
            TranscriptionState::TranscriptSucceeded(_) => "Transcription complete.".to_string(),
            TranscriptionState::ConversionFailed(failure) => {
                format!("Conversion failed: {}", failure)
            }
            TranscriptionState::UploadFailed(failure) => format!("Upload failed: {}", failure),
        };
        eprintln!("{}", line);
    }

    fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
        tracing::debug!(busy, "Transcription controls updated");
    }
}
