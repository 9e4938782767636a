use super::AudioFormat;

/// Which source formats must be converted before upload, and into what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPolicy {
    mandatory: Vec<AudioFormat>,
    target: AudioFormat,
}

impl ConversionPolicy {
    pub fn new(mandatory: Vec<AudioFormat>, target: AudioFormat) -> Self {
        Self { mandatory, target }
    }

    /// Unknown formats are uploaded as-is and left to the endpoint to judge.
    pub fn requires_conversion(&self, format: Option<AudioFormat>) -> bool {
        format.is_some_and(|f| self.mandatory.contains(&f))
    }

    pub fn target(&self) -> AudioFormat {
        self.target
    }

    pub fn mandatory(&self) -> &[AudioFormat] {
        &self.mandatory
    }
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        Self::new(vec![AudioFormat::Aac], AudioFormat::Mp3)
    }
}
