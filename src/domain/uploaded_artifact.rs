use bytes::Bytes;

use super::AudioFormat;

/// An audio blob received from a caller, owned by the request handling it.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedArtifact {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedArtifact {
    pub fn new(filename: impl Into<String>, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn declared_format(&self) -> Option<AudioFormat> {
        AudioFormat::detect(&self.filename, self.content_type.as_deref())
    }

    /// Lowercased filename extension, if it is a plain alphanumeric token.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.filename.rsplit_once('.')?;
        let valid = !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric());
        valid.then(|| ext.to_ascii_lowercase())
    }
}
