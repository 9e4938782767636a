use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    AudioConverter, ConversionError, ConversionOutcome, ProcessError, ProcessRunner, ScratchStore,
    ToolInvocation,
};
use crate::domain::{AudioFormat, ConvertedAudio, ScratchPath, UploadedArtifact};

use super::scratch_lease::ScratchLease;

const INPUT_FALLBACK_EXTENSION: &str = "bin";

/// How to invoke the external transcoder.
#[derive(Debug, Clone)]
pub struct TranscoderConfig {
    pub program: String,
    /// Flags placed before `-i`, e.g. `-hide_banner -nostdin`.
    pub global_args: Vec<String>,
    pub timeout: Option<Duration>,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            global_args: vec!["-hide_banner".to_string(), "-nostdin".to_string()],
            timeout: Some(Duration::from_secs(300)),
        }
    }
}

/// Stateless conversion of one upload per call through the external transcoder.
pub struct ConversionService {
    runner: Arc<dyn ProcessRunner>,
    scratch: Arc<dyn ScratchStore>,
    transcoder: TranscoderConfig,
}

impl ConversionService {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        scratch: Arc<dyn ScratchStore>,
        transcoder: TranscoderConfig,
    ) -> Self {
        Self {
            runner,
            scratch,
            transcoder,
        }
    }

    pub fn transcoder(&self) -> &TranscoderConfig {
        &self.transcoder
    }

    async fn transcode(
        &self,
        upload: &UploadedArtifact,
        input: &ScratchPath,
        output: &ScratchPath,
        target: AudioFormat,
        cancellation: CancellationToken,
    ) -> ConversionOutcome {
        self.scratch
            .write(input, &upload.data)
            .await
            .map_err(|e| ConversionError::Io(e.to_string()))?;

        tracing::debug!(input = %input, bytes = upload.len(), "Upload staged for transcoding");

        let invocation = ToolInvocation::new(self.transcoder.program.clone())
            .args(self.transcoder.global_args.iter())
            .arg("-i")
            .arg(input.as_path())
            .args(target.encoder_args().iter().copied())
            .arg("-y")
            .arg(output.as_path())
            .timeout(self.transcoder.timeout)
            .cancellation(cancellation);

        let result = self
            .runner
            .run(invocation)
            .await
            .map_err(|e| self.map_process_error(e))?;

        if !result.success() {
            tracing::warn!(
                exit_code = ?result.exit_code,
                stderr_bytes = result.stderr.len(),
                duration_ms = result.duration_ms,
                "Transcoder exited unsuccessfully"
            );
            return Err(ConversionError::Subprocess {
                exit_code: result.exit_code,
                stderr: result.stderr,
            });
        }

        let data = self
            .scratch
            .read(output)
            .await
            .map_err(|e| ConversionError::Io(e.to_string()))?;

        tracing::info!(
            input_bytes = upload.len(),
            output_bytes = data.len(),
            duration_ms = result.duration_ms,
            "Conversion completed"
        );

        Ok(ConvertedAudio::new(Bytes::from(data), target))
    }

    fn map_process_error(&self, error: ProcessError) -> ConversionError {
        match error {
            ProcessError::Spawn { program, source } if source.kind() == io::ErrorKind::NotFound => {
                ConversionError::ToolUnavailable(format!("{} was not found", program))
            }
            e @ ProcessError::Spawn { .. } => ConversionError::ToolUnavailable(e.to_string()),
            e @ ProcessError::Wait { .. } => ConversionError::Io(e.to_string()),
            ProcessError::TimedOut { after, .. } => ConversionError::Timeout(after),
            ProcessError::Cancelled { .. } => ConversionError::Cancelled,
        }
    }
}

#[async_trait]
impl AudioConverter for ConversionService {
    #[tracing::instrument(
        skip(self, upload, cancellation),
        fields(filename = %upload.filename, bytes = upload.len())
    )]
    async fn convert(
        &self,
        upload: UploadedArtifact,
        target: AudioFormat,
        cancellation: CancellationToken,
    ) -> ConversionOutcome {
        if upload.is_empty() {
            tracing::warn!("Rejecting empty upload");
            return Err(ConversionError::InvalidInput(
                "uploaded file is empty".to_string(),
            ));
        }

        let mut lease = ScratchLease::new(Arc::clone(&self.scratch));
        let input_extension = upload
            .extension()
            .unwrap_or_else(|| INPUT_FALLBACK_EXTENSION.to_string());
        let input = lease.allocate(&input_extension);
        let output = lease.allocate(target.extension());

        let result = self
            .transcode(&upload, &input, &output, target, cancellation)
            .await;

        lease.release().await;

        result
    }
}
