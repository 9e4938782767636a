use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{AudioUpload, FailureKind, TranscriptionResult};

use super::audio_converter::describe_status;

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(&self, audio: &AudioUpload)
    -> Result<TranscriptionResult, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("failed to read audio file: {0}")]
    Io(String),
    #[error("transcription endpoint returned {}: {body}", describe_status(.status))]
    Network { status: Option<u16>, body: String },
    #[error("could not parse transcription response: {0}")]
    Parse(String),
    #[error("transcription request did not finish within {}s", .0.as_secs())]
    Timeout(Duration),
}

impl TranscriptionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TranscriptionError::Io(_) => FailureKind::Io,
            TranscriptionError::Network { .. } => FailureKind::Network,
            TranscriptionError::Parse(_) => FailureKind::Parse,
            TranscriptionError::Timeout(_) => FailureKind::Timeout,
        }
    }
}
