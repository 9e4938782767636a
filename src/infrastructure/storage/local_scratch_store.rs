use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{ScratchStore, ScratchStoreError};
use crate::domain::ScratchPath;

/// Scratch files in a local directory, the platform temp dir unless configured otherwise.
pub struct LocalScratchStore {
    directory: PathBuf,
}

impl LocalScratchStore {
    pub fn new(directory: PathBuf) -> io::Result<Self> {
        let directory = if directory.is_absolute() {
            directory
        } else {
            std::env::current_dir()?.join(directory)
        };
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn in_temp_dir() -> io::Result<Self> {
        Self::new(std::env::temp_dir())
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[async_trait]
impl ScratchStore for LocalScratchStore {
    fn allocate(&self, extension: &str) -> ScratchPath {
        ScratchPath::generate(&self.directory, extension)
    }

    async fn write(&self, path: &ScratchPath, data: &[u8]) -> Result<(), ScratchStoreError> {
        let write_failed = |source| ScratchStoreError::WriteFailed {
            path: path.to_string(),
            source,
        };

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path.as_path())
            .await
            .map_err(write_failed)?;
        file.write_all(data).await.map_err(write_failed)?;
        file.flush().await.map_err(write_failed)?;
        file.sync_data().await.map_err(write_failed)?;
        Ok(())
    }

    async fn read(&self, path: &ScratchPath) -> Result<Vec<u8>, ScratchStoreError> {
        tokio::fs::read(path.as_path())
            .await
            .map_err(|source| ScratchStoreError::ReadFailed {
                path: path.to_string(),
                source,
            })
    }

    async fn delete(&self, path: &ScratchPath) -> Result<bool, ScratchStoreError> {
        match tokio::fs::remove_file(path.as_path()).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ScratchStoreError::DeleteFailed {
                path: path.to_string(),
                source,
            }),
        }
    }

    fn delete_now(&self, path: &ScratchPath) -> Result<bool, ScratchStoreError> {
        match std::fs::remove_file(path.as_path()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ScratchStoreError::DeleteFailed {
                path: path.to_string(),
                source,
            }),
        }
    }
}
