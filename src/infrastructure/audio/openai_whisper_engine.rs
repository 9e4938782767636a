use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Body, Client, multipart};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::{AudioUpload, TranscriptionResult};
use crate::infrastructure::observability::sanitize_diagnostic;

/// OpenAI-compatible `audio/transcriptions` client (OpenAI, Groq, self-hosted Whisper servers).
pub struct OpenAiWhisperEngine {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Option<Duration>,
}

impl OpenAiWhisperEngine {
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_error(&self, e: reqwest::Error) -> TranscriptionError {
        if e.is_timeout() {
            TranscriptionError::Timeout(self.timeout.unwrap_or_default())
        } else {
            TranscriptionError::Network {
                status: e.status().map(|s| s.as_u16()),
                body: e.to_string(),
            }
        }
    }

    async fn file_part(&self, audio: &AudioUpload) -> Result<multipart::Part, TranscriptionError> {
        let file = tokio::fs::File::open(&audio.path)
            .await
            .map_err(|e| TranscriptionError::Io(format!("{}: {}", audio.path.display(), e)))?;
        let length = file
            .metadata()
            .await
            .map_err(|e| TranscriptionError::Io(format!("{}: {}", audio.path.display(), e)))?
            .len();

        let body = Body::wrap_stream(ReaderStream::new(file));

        multipart::Part::stream_with_length(body, length)
            .file_name(audio.filename.clone())
            .mime_str(&audio.media_type)
            .map_err(|e| TranscriptionError::Io(format!("mime: {}", e)))
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

#[async_trait]
impl TranscriptionEngine for OpenAiWhisperEngine {
    async fn transcribe(
        &self,
        audio: &AudioUpload,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let form = multipart::Form::new()
            .part("file", self.file_part(audio).await?)
            .text("model", self.model.clone());

        tracing::debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            filename = %audio.filename,
            "Uploading audio for transcription"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                body = %sanitize_diagnostic(&body),
                "Transcription endpoint returned an error"
            );
            return Err(TranscriptionError::Network {
                status: Some(status.as_u16()),
                body,
            });
        }

        let parsed: TranscriptionResponse = serde_json::from_str(&body)
            .map_err(|e| TranscriptionError::Parse(format!("invalid JSON: {}", e)))?;

        let text = parsed.text.ok_or_else(|| {
            TranscriptionError::Parse("response has no \"text\" field".to_string())
        })?;

        tracing::info!(chars = text.len(), "Transcription completed");

        Ok(TranscriptionResult::new(text.trim()))
    }
}
