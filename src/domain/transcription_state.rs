use std::fmt;

use super::{Failure, TranscriptionResult};

/// Progress of one transcription request.
///
/// `TranscriptSucceeded`, `ConversionFailed` and `UploadFailed` are terminal; every other state
/// advances only through [`TranscriptionState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionState {
    Selected,
    Converting,
    ConversionSucceeded,
    ConversionFailed(Failure),
    Uploading,
    TranscriptSucceeded(TranscriptionResult),
    UploadFailed(Failure),
}

/// Inputs that drive [`TranscriptionState`] forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionEvent {
    ConversionRequired,
    ConversionNotRequired,
    Converted,
    ConversionRejected(Failure),
    UploadStarted,
    Transcribed(TranscriptionResult),
    UploadRejected(Failure),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid transition: {event} while {state}")]
pub struct InvalidTransition {
    pub state: &'static str,
    pub event: &'static str,
}

impl TranscriptionState {
    pub fn apply(self, event: TranscriptionEvent) -> Result<Self, InvalidTransition> {
        use TranscriptionEvent as E;
        use TranscriptionState as S;

        match (self, event) {
            (S::Selected, E::ConversionRequired) => Ok(S::Converting),
            (S::Selected, E::ConversionNotRequired) => Ok(S::Uploading),
            (S::Converting, E::Converted) => Ok(S::ConversionSucceeded),
            (S::Converting, E::ConversionRejected(failure)) => Ok(S::ConversionFailed(failure)),
            (S::ConversionSucceeded, E::UploadStarted) => Ok(S::Uploading),
            (S::Uploading, E::Transcribed(result)) => Ok(S::TranscriptSucceeded(result)),
            (S::Uploading, E::UploadRejected(failure)) => Ok(S::UploadFailed(failure)),
            (state, event) => Err(InvalidTransition {
                state: state.name(),
                event: event.name(),
            }),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TranscriptionState::TranscriptSucceeded(_)
                | TranscriptionState::ConversionFailed(_)
                | TranscriptionState::UploadFailed(_)
        )
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            TranscriptionState::ConversionFailed(f) | TranscriptionState::UploadFailed(f) => Some(f),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TranscriptionState::Selected => "selected",
            TranscriptionState::Converting => "converting",
            TranscriptionState::ConversionSucceeded => "conversion_succeeded",
            TranscriptionState::ConversionFailed(_) => "conversion_failed",
            TranscriptionState::Uploading => "uploading",
            TranscriptionState::TranscriptSucceeded(_) => "transcript_succeeded",
            TranscriptionState::UploadFailed(_) => "upload_failed",
        }
    }
}

impl TranscriptionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TranscriptionEvent::ConversionRequired => "conversion_required",
            TranscriptionEvent::ConversionNotRequired => "conversion_not_required",
            TranscriptionEvent::Converted => "converted",
            TranscriptionEvent::ConversionRejected(_) => "conversion_rejected",
            TranscriptionEvent::UploadStarted => "upload_started",
            TranscriptionEvent::Transcribed(_) => "transcribed",
            TranscriptionEvent::UploadRejected(_) => "upload_rejected",
        }
    }
}

impl fmt::Display for TranscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
