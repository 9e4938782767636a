use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{AudioFormat, ConvertedAudio, FailureKind, UploadedArtifact};

pub type ConversionOutcome = Result<ConvertedAudio, ConversionError>;

/// Converts one uploaded blob into the requested format.
#[async_trait]
pub trait AudioConverter: Send + Sync {
    async fn convert(
        &self,
        upload: UploadedArtifact,
        target: AudioFormat,
        cancellation: CancellationToken,
    ) -> ConversionOutcome;
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("transcoder exited with {}: {stderr}", describe_exit(.exit_code))]
    Subprocess {
        exit_code: Option<i32>,
        stderr: String,
    },
    #[error("transcoder unavailable: {0}")]
    ToolUnavailable(String),
    #[error("scratch i/o failed: {0}")]
    Io(String),
    #[error("conversion service returned {}: {body}", describe_status(.status))]
    Network { status: Option<u16>, body: String },
    #[error("conversion service returned {received} bytes, expected at least {minimum}")]
    UndersizedResponse { received: usize, minimum: usize },
    #[error("conversion did not finish within {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("conversion was cancelled")]
    Cancelled,
}

impl ConversionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ConversionError::InvalidInput(_) => FailureKind::InvalidInput,
            ConversionError::Subprocess { .. } | ConversionError::ToolUnavailable(_) => {
                FailureKind::Subprocess
            }
            ConversionError::Io(_) => FailureKind::Io,
            ConversionError::Network { .. } | ConversionError::UndersizedResponse { .. } => {
                FailureKind::Network
            }
            ConversionError::Timeout(_) => FailureKind::Timeout,
            ConversionError::Cancelled => FailureKind::Cancelled,
        }
    }
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

pub(crate) fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no response".to_string(),
    }
}
