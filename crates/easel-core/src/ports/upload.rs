//! File storage port for uploaded images.

use async_trait::async_trait;

use crate::domain::IncomingFile;

/// Where an accepted upload ended up.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Generated name, relative to the upload directory.
    pub filename: String,
    pub size: usize,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Validate and persist an upload under a freshly generated name.
    async fn store(&self, file: IncomingFile) -> Result<StoredFile, UploadError>;

    /// Delete a previously stored file. A missing file is not an error.
    async fn remove(&self, filename: &str) -> Result<(), UploadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file uploaded.")]
    Missing,

    #[error("{0}")]
    Rejected(String),

    #[error("File exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("Storage failure: {0}")]
    Io(String),
}
