use std::path::{Path, PathBuf};

use super::AudioFormat;

/// Fallback media type for artifacts that declare none.
pub const DEFAULT_MEDIA_TYPE: &str = "audio/mpeg";

/// A user-selected audio file on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub path: PathBuf,
    pub filename: String,
    pub content_type: Option<String>,
}

impl AudioArtifact {
    pub fn new(path: impl Into<PathBuf>, content_type: Option<String>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        let content_type = content_type.or_else(|| {
            AudioFormat::detect(&filename, None).map(|f| f.media_type().to_string())
        });
        Self {
            path,
            filename,
            content_type,
        }
    }

    pub fn format(&self) -> Option<AudioFormat> {
        AudioFormat::detect(&self.filename, self.content_type.as_deref())
    }

    pub fn media_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_MEDIA_TYPE)
    }

    pub fn stem(&self) -> &str {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio")
    }
}

/// A file ready to be streamed to the transcription endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioUpload {
    pub path: PathBuf,
    pub filename: String,
    pub media_type: String,
}

impl AudioUpload {
    pub fn from_artifact(artifact: &AudioArtifact) -> Self {
        Self {
            path: artifact.path.clone(),
            filename: artifact.filename.clone(),
            media_type: artifact.media_type().to_string(),
        }
    }
}
