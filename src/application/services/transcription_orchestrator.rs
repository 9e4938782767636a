use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    AudioConverter, ConversionError, ScratchStore, TranscriptionEngine, TranscriptionObserver,
};
use crate::domain::{
    AudioArtifact, AudioUpload, ConversionPolicy, Failure, FailureKind, InvalidTransition,
    TranscriptionEvent, TranscriptionResult, TranscriptionState, UploadedArtifact,
};

use super::scratch_lease::ScratchLease;

#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error("conversion failed ({}): {}", .0.kind, .0.diagnostic)]
    ConversionFailed(Failure),
    #[error("upload failed ({}): {}", .0.kind, .0.diagnostic)]
    UploadFailed(Failure),
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
}

impl TranscribeError {
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            TranscribeError::ConversionFailed(f) | TranscribeError::UploadFailed(f) => Some(f),
            TranscribeError::InvalidTransition(_) => None,
        }
    }
}

/// Drives one selected artifact through optional conversion and upload.
pub struct TranscriptionOrchestrator {
    converter: Arc<dyn AudioConverter>,
    engine: Arc<dyn TranscriptionEngine>,
    scratch: Arc<dyn ScratchStore>,
    policy: ConversionPolicy,
    observer: Arc<dyn TranscriptionObserver>,
}

/// Clears the observer's busy flag however the request ends.
struct BusyGuard<'a> {
    observer: &'a dyn TranscriptionObserver,
}

impl<'a> BusyGuard<'a> {
    fn engage(observer: &'a dyn TranscriptionObserver) -> Self {
        observer.set_busy(true);
        Self { observer }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.observer.set_busy(false);
    }
}

impl TranscriptionOrchestrator {
    pub fn new(
        converter: Arc<dyn AudioConverter>,
        engine: Arc<dyn TranscriptionEngine>,
        scratch: Arc<dyn ScratchStore>,
        policy: ConversionPolicy,
        observer: Arc<dyn TranscriptionObserver>,
    ) -> Self {
        Self {
            converter,
            engine,
            scratch,
            policy,
            observer,
        }
    }

    pub fn policy(&self) -> &ConversionPolicy {
        &self.policy
    }

    #[tracing::instrument(skip(self, artifact, cancellation), fields(filename = %artifact.filename))]
    pub async fn transcribe(
        &self,
        artifact: &AudioArtifact,
        cancellation: CancellationToken,
    ) -> Result<TranscriptionResult, TranscribeError> {
        let _busy = BusyGuard::engage(self.observer.as_ref());
        let mut lease = ScratchLease::new(Arc::clone(&self.scratch));

        let state = self.run(artifact, &mut lease, &cancellation).await;

        lease.release().await;

        match state? {
            TranscriptionState::TranscriptSucceeded(result) => Ok(result),
            TranscriptionState::ConversionFailed(failure) => {
                Err(TranscribeError::ConversionFailed(failure))
            }
            TranscriptionState::UploadFailed(failure) => Err(TranscribeError::UploadFailed(failure)),
            other => Err(TranscribeError::InvalidTransition(InvalidTransition {
                state: other.name(),
                event: "finished",
            })),
        }
    }

    async fn run(
        &self,
        artifact: &AudioArtifact,
        lease: &mut ScratchLease,
        cancellation: &CancellationToken,
    ) -> Result<TranscriptionState, InvalidTransition> {
        let mut state = TranscriptionState::Selected;
        self.observer.on_transition(&state);

        let format = artifact.format();
        let upload = if self.policy.requires_conversion(format) {
            tracing::info!(
                format = ?format,
                target = %self.policy.target(),
                "Format requires conversion before upload"
            );
            state = self.advance(state, TranscriptionEvent::ConversionRequired)?;

            match self.convert(artifact, lease, cancellation).await {
                Ok(upload) => {
                    state = self.advance(state, TranscriptionEvent::Converted)?;
                    state = self.advance(state, TranscriptionEvent::UploadStarted)?;
                    upload
                }
                Err(failure) => {
                    tracing::warn!(failure = %failure, "Conversion failed, upload skipped");
                    return self.advance(state, TranscriptionEvent::ConversionRejected(failure));
                }
            }
        } else {
            state = self.advance(state, TranscriptionEvent::ConversionNotRequired)?;
            AudioUpload::from_artifact(artifact)
        };

        let event = match cancellable(cancellation, self.engine.transcribe(&upload)).await {
            Some(Ok(result)) => {
                tracing::info!(chars = result.text.len(), "Transcript received");
                TranscriptionEvent::Transcribed(result)
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Upload failed");
                TranscriptionEvent::UploadRejected(Failure::new(e.kind(), e.to_string()))
            }
            None => TranscriptionEvent::UploadRejected(Failure::new(
                FailureKind::Cancelled,
                "upload was cancelled",
            )),
        };

        self.advance(state, event)
    }

    /// Converts through the configured converter and stages the result in a scratch file of
    /// this orchestrator's own, so it can be streamed into the upload.
    async fn convert(
        &self,
        artifact: &AudioArtifact,
        lease: &mut ScratchLease,
        cancellation: &CancellationToken,
    ) -> Result<AudioUpload, Failure> {
        let data = tokio::fs::read(&artifact.path).await.map_err(|e| {
            Failure::new(
                FailureKind::Io,
                format!("failed to read {}: {}", artifact.path.display(), e),
            )
        })?;

        let source = UploadedArtifact::new(
            artifact.filename.clone(),
            artifact.content_type.clone(),
            Bytes::from(data),
        );
        let target = self.policy.target();

        let converted = cancellable(
            cancellation,
            self.converter.convert(source, target, cancellation.clone()),
        )
        .await
        .unwrap_or(Err(ConversionError::Cancelled))
        .map_err(|e| Failure::new(e.kind(), e.to_string()))?;

        let staged = lease.allocate(converted.format.extension());
        lease
            .store()
            .write(&staged, &converted.data)
            .await
            .map_err(|e| Failure::new(FailureKind::Io, e.to_string()))?;

        Ok(AudioUpload {
            path: staged.into_path_buf(),
            filename: format!("{}.{}", artifact.stem(), converted.format.extension()),
            media_type: converted.media_type().to_string(),
        })
    }

    fn advance(
        &self,
        state: TranscriptionState,
        event: TranscriptionEvent,
    ) -> Result<TranscriptionState, InvalidTransition> {
        let next = state.apply(event)?;
        tracing::debug!(state = %next, "Transcription state changed");
        self.observer.on_transition(&next);
        Ok(next)
    }
}

async fn cancellable<F: Future>(token: &CancellationToken, future: F) -> Option<F::Output> {
    tokio::select! {
        output = future => Some(output),
        () = token.cancelled() => None,
    }
}
