use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, multipart};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{AudioConverter, ConversionError, ConversionOutcome};
use crate::domain::{AudioFormat, ConvertedAudio, DEFAULT_MEDIA_TYPE, UploadedArtifact};
use crate::infrastructure::observability::sanitize_diagnostic;

/// Delegates conversion to a remote conversion service over HTTP.
pub struct RemoteConversionClient {
    client: Client,
    endpoint: String,
    min_response_bytes: usize,
    timeout: Option<Duration>,
}

impl RemoteConversionClient {
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        min_response_bytes: usize,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/convert", base_url.trim_end_matches('/')),
            min_response_bytes,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_error(&self, e: reqwest::Error) -> ConversionError {
        if e.is_timeout() {
            ConversionError::Timeout(self.timeout.unwrap_or_default())
        } else {
            ConversionError::Network {
                status: e.status().map(|s| s.as_u16()),
                body: e.to_string(),
            }
        }
    }

    async fn send(&self, upload: UploadedArtifact, target: AudioFormat) -> ConversionOutcome {
        let media_type = upload
            .content_type
            .clone()
            .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string());
        let file_part = multipart::Part::stream_with_length(upload.data.clone(), upload.len() as u64)
            .file_name(upload.filename.clone())
            .mime_str(&media_type)
            .map_err(|e| ConversionError::InvalidInput(format!("content type: {}", e)))?;

        let form = multipart::Form::new().part("file", file_part);

        tracing::debug!(endpoint = %self.endpoint, target = %target, "Delegating conversion");

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("format", target.extension())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::warn!(
                status = status.as_u16(),
                body = %sanitize_diagnostic(&body),
                "Conversion service rejected upload"
            );
            return Err(ConversionError::Network {
                status: Some(status.as_u16()),
                body,
            });
        }

        let data = response.bytes().await.map_err(|e| self.request_error(e))?;

        if data.len() < self.min_response_bytes.max(1) {
            return Err(ConversionError::UndersizedResponse {
                received: data.len(),
                minimum: self.min_response_bytes.max(1),
            });
        }

        tracing::info!(bytes = data.len(), "Remote conversion completed");

        Ok(ConvertedAudio::new(data, target))
    }
}

#[async_trait]
impl AudioConverter for RemoteConversionClient {
    async fn convert(
        &self,
        upload: UploadedArtifact,
        target: AudioFormat,
        cancellation: CancellationToken,
    ) -> ConversionOutcome {
        if upload.is_empty() {
            return Err(ConversionError::InvalidInput(
                "uploaded file is empty".to_string(),
            ));
        }

        tokio::select! {
            outcome = self.send(upload, target) => outcome,
            () = cancellation.cancelled() => Err(ConversionError::Cancelled),
        }
    }
}
