use std::sync::Arc;

use crate::application::ports::ScratchStore;
use crate::domain::ScratchPath;

/// Owns a set of scratch paths for the duration of one attempt.
///
/// Call [`ScratchLease::release`] on every normal exit path. If the owning future is dropped
/// first (cancellation, client disconnect), the paths are removed synchronously on drop.
/// Deletion failures are logged and never returned.
pub struct ScratchLease {
    store: Arc<dyn ScratchStore>,
    paths: Vec<ScratchPath>,
}

impl ScratchLease {
    pub fn new(store: Arc<dyn ScratchStore>) -> Self {
        Self {
            store,
            paths: Vec::new(),
        }
    }

    /// Reserves a new unique path tracked by this lease.
    pub fn allocate(&mut self, extension: &str) -> ScratchPath {
        let path = self.store.allocate(extension);
        self.paths.push(path.clone());
        path
    }

    pub fn store(&self) -> &Arc<dyn ScratchStore> {
        &self.store
    }

    pub fn paths(&self) -> &[ScratchPath] {
        &self.paths
    }

    pub async fn release(mut self) {
        for path in std::mem::take(&mut self.paths) {
            match self.store.delete(&path).await {
                Ok(true) => tracing::debug!(path = %path, "Scratch file removed"),
                Ok(false) => {}
                Err(e) => tracing::warn!(error = %e, path = %path, "Failed to remove scratch file"),
            }
        }
    }
}

// Removal on drop is synchronous so the files are gone once the lease is. Normal paths call
// `release`, which goes through the async store; only the few files of an aborted run land here.
impl Drop for ScratchLease {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            match self.store.delete_now(&path) {
                Ok(true) => tracing::debug!(path = %path, "Scratch file removed on drop"),
                Ok(false) => {}
                Err(e) => tracing::warn!(
                    error = %e,
                    path = %path,
                    "Failed to remove scratch file on drop"
                ),
            }
        }
    }
}
