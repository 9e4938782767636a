use std::fmt;
use std::path::{Path, PathBuf};

use uuid::Uuid;

const FALLBACK_EXTENSION: &str = "bin";

/// Location of a single scratch file, named by a random UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScratchPath(PathBuf);

impl ScratchPath {
    pub fn generate(directory: &Path, extension: &str) -> Self {
        let extension = sanitize_extension(extension);
        Self(directory.join(format!("scratch-{}.{}", Uuid::new_v4(), extension)))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

fn sanitize_extension(extension: &str) -> &str {
    let ext = extension.trim_start_matches('.');
    let valid = !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    if valid { ext } else { FALLBACK_EXTENSION }
}

impl AsRef<Path> for ScratchPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ScratchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
