use std::io;

use async_trait::async_trait;

use crate::domain::ScratchPath;

/// Short-lived files handed to and produced by external tools.
#[async_trait]
pub trait ScratchStore: Send + Sync {
    /// Reserves a unique path. Nothing is created on disk until the path is written.
    fn allocate(&self, extension: &str) -> ScratchPath;

    async fn write(&self, path: &ScratchPath, data: &[u8]) -> Result<(), ScratchStoreError>;

    async fn read(&self, path: &ScratchPath) -> Result<Vec<u8>, ScratchStoreError>;

    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, path: &ScratchPath) -> Result<bool, ScratchStoreError>;

    /// Synchronous variant for cleanup paths that cannot await.
    fn delete_now(&self, path: &ScratchPath) -> Result<bool, ScratchStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ScratchStoreError {
    #[error("failed to write scratch file {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to read scratch file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to delete scratch file {path}: {source}")]
    DeleteFailed {
        path: String,
        #[source]
        source: io::Error,
    },
}
