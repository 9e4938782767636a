use bytes::Bytes;

use super::AudioFormat;

/// Bytes produced by a successful conversion, tagged with their format.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedAudio {
    pub data: Bytes,
    pub format: AudioFormat,
}

impl ConvertedAudio {
    pub fn new(data: Bytes, format: AudioFormat) -> Self {
        Self { data, format }
    }

    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }

    pub fn download_name(&self) -> String {
        format!("converted.{}", self.format.extension())
    }
}
