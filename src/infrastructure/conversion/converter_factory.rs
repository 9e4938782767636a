use std::sync::Arc;

use crate::application::ports::{AudioConverter, ProcessRunner, ScratchStore};
use crate::application::services::{ConversionService, TranscoderConfig};
use crate::presentation::config::{ConversionClientSettings, ConversionMode, TranscoderSettings};

use super::remote_conversion_client::RemoteConversionClient;

pub struct ConverterFactory;

impl ConverterFactory {
    pub fn create(
        mode: ConversionMode,
        client: &ConversionClientSettings,
        transcoder: &TranscoderSettings,
        runner: Arc<dyn ProcessRunner>,
        scratch: Arc<dyn ScratchStore>,
    ) -> Result<Arc<dyn AudioConverter>, reqwest::Error> {
        match mode {
            ConversionMode::Local => {
                tracing::info!(program = %transcoder.program, "Converting in-process");
                let service = ConversionService::new(runner, scratch, transcoder_config(transcoder));
                Ok(Arc::new(service))
            }
            ConversionMode::Remote => {
                let remote = RemoteConversionClient::new(
                    &client.remote_url,
                    client.timeout(),
                    client.min_response_bytes,
                )?;
                tracing::info!(endpoint = %remote.endpoint(), "Delegating conversion to remote service");
                Ok(Arc::new(remote))
            }
        }
    }
}

pub fn transcoder_config(settings: &TranscoderSettings) -> TranscoderConfig {
    TranscoderConfig {
        program: settings.program.clone(),
        global_args: settings.global_args.clone(),
        timeout: settings.timeout(),
    }
}
