use std::sync::Arc;

use crate::application::services::ConversionService;
use crate::domain::AudioFormat;

#[derive(Clone)]
pub struct AppState {
    pub conversion_service: Arc<ConversionService>,
    pub default_format: AudioFormat,
    pub max_upload_bytes: usize,
}
